use clap::{Args, Parser, Subcommand};
use filemanager::{
    AppState, BackendConfig, Config, InMemoryStorage, S3Backend, StorageBackend,
    client::{ApiClient, SelectedFile, Uploader, format_file_size},
    config::Overrides,
    create_app,
    storage::signing::{MAX_EXPIRY, UploadSigner},
    types::ObjectSummary,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Server configuration
const HOST: &str = "0.0.0.0";
const PORT: u16 = 3000;

const DEFAULT_API_URL: &str = "http://localhost:3000";

/// File manager: list a bucket and upload files to it through presigned URLs
#[derive(Parser, Debug)]
#[command(name = "filemanager")]
#[command(about = "Presigned-upload file manager backed by an S3 compatible bucket", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP backend
    Serve(ServeArgs),
    /// Upload a local file through the backend
    Upload {
        #[command(flatten)]
        api: ApiArgs,
        /// File to upload; its name becomes the object key
        file: PathBuf,
    },
    /// List objects at the bucket root
    List {
        #[command(flatten)]
        api: ApiArgs,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Path to the configuration file (JSON or YAML)
    #[arg(short, long, env = "CONFIG_PATH")]
    config: PathBuf,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = PORT)]
    port: u16,

    /// Bucket name, overrides the config file
    #[arg(long, env = "BUCKET_NAME")]
    bucket: Option<String>,

    /// Access key for the object store, overrides the config file
    #[arg(long, env = "AWS_ACCESS_KEY")]
    access_key_id: Option<String>,

    /// Secret key for the object store, overrides the config file
    #[arg(long, env = "AWS_SECRET_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,
}

#[derive(Args, Debug)]
struct ApiArgs {
    /// Base URL of the file manager backend
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Upload { api, file } => upload(api, file).await,
        Command::List { api } => list(api).await,
    }
}

async fn serve(args: ServeArgs) {
    let mut config = match Config::from_file(&args.config) {
        Ok(cfg) => {
            tracing::info!("Loaded configuration from {}", args.config.display());
            cfg
        }
        Err(e) => {
            tracing::error!(
                "Failed to load config file '{}': {}",
                args.config.display(),
                e
            );
            tracing::error!(
                "Configuration file is required. Use --config <path> or set CONFIG_PATH environment variable."
            );
            std::process::exit(1);
        }
    };

    config.apply(Overrides {
        bucket: args.bucket,
        access_key_id: args.access_key_id,
        secret_access_key: args.secret_access_key,
    });

    let (storage, local_store): (Arc<dyn StorageBackend>, Option<InMemoryStorage>) =
        match &config.backend {
            BackendConfig::S3(s3_config) => {
                tracing::info!(
                    "Initializing S3 backend: bucket={}, region={}",
                    s3_config.bucket,
                    s3_config.region
                );
                if s3_config.access_key_id.is_none() || s3_config.secret_access_key.is_none() {
                    tracing::warn!(
                        "No static credentials configured, using the default AWS provider chain"
                    );
                }
                (Arc::new(S3Backend::new(s3_config).await), None)
            }
            BackendConfig::Memory(mem_config) => {
                let public_url = mem_config.public_url.clone().unwrap_or_else(|| {
                    let host = if args.host == HOST {
                        "localhost"
                    } else {
                        args.host.as_str()
                    };
                    format!("http://{}:{}", host, args.port)
                });
                let signer = mem_config
                    .signing_secret
                    .clone()
                    .map(UploadSigner::new)
                    .unwrap_or_else(UploadSigner::ephemeral);

                tracing::info!(
                    "Initializing in-memory backend: bucket={}, public url={}",
                    mem_config.bucket,
                    public_url
                );
                let store = InMemoryStorage::with_signer(&mem_config.bucket, public_url, signer);
                (Arc::new(store.clone()), Some(store))
            }
        };

    tracing::info!(
        "Upload URLs expire after {}s; listing prefix forwarding is {}",
        config.upload_expiry_secs,
        if config.forward_prefix { "on" } else { "off" }
    );
    if config.upload_expiry() > MAX_EXPIRY {
        tracing::warn!(
            "upload_expiry_secs exceeds {}s; upload authorization requests will fail",
            MAX_EXPIRY.as_secs()
        );
    }

    let app_state =
        AppState::new(storage, config.upload_expiry()).with_forward_prefix(config.forward_prefix);
    let app = create_app(app_state, local_store);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("File manager API listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn upload(api: ApiArgs, path: PathBuf) {
    let file = match SelectedFile::from_path(&path).await {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut uploader = Uploader::new(ApiClient::new(api.api_url));
    println!("{} ({})", file.name, format_file_size(file.size()));
    uploader.select_file(file);

    match uploader.upload().await {
        Ok(attempt) => {
            println!("{}", uploader.status_text());
            println!(
                "{} ({})",
                attempt.file_name,
                format_file_size(attempt.file_size)
            );
            print_objects(uploader.objects());
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn list(api: ApiArgs) {
    match ApiClient::new(api.api_url).list_objects().await {
        Ok(objects) => print_objects(&objects),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn print_objects(objects: &[ObjectSummary]) {
    if objects.is_empty() {
        println!("No files found");
        return;
    }

    for object in objects {
        let kind = if object.is_folder() { "dir " } else { "file" };
        println!(
            "{} {:<40} {:>10}  {}",
            kind,
            object.key,
            format_file_size(object.size),
            object.last_modified.format("%Y-%m-%d")
        );
    }
}
