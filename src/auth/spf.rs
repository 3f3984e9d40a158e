/// Marker every published SPF record carries.
const SPF_VERSION_MARKER: &str = "v=spf1";

/// Picks the SPF record out of a domain's flattened TXT records: the first
/// record containing the version marker wins.
pub(crate) fn select_record(records: &[String]) -> Option<String> {
    records
        .iter()
        .find(|record| record.contains(SPF_VERSION_MARKER))
        .cloned()
}
