mod list_objects;
mod not_found;
mod put_object;
mod query;
mod upload_url;

pub use list_objects::list_objects;
pub use not_found::not_found;
pub use put_object::put_object;
pub use upload_url::upload_url;
