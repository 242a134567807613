/// First non-empty value among `names`, in query-string order.
///
/// Repeated parameters are tolerated; later occurrences are ignored.
pub(crate) fn first_param<'a>(params: &'a [(String, String)], names: &[&str]) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, value)| names.contains(&name.as_str()) && !value.is_empty())
        .map(|(_, value)| value.as_str())
}
