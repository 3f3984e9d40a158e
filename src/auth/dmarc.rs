/// Joins every TXT record published at the `_dmarc` name into one policy
/// string, with no separator between segments. `None` when nothing was
/// published there.
pub(crate) fn concat_records(records: &[String]) -> Option<String> {
    if records.is_empty() {
        None
    } else {
        Some(records.concat())
    }
}
