use super::table::EventTable;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Share of prompt-group wins per backend.
///
/// Only rated rows take part. Rows are compared within groups of identical
/// prompt text; every backend reaching the group's top rating scores one win
/// for that group. Each backend's wins are divided by the total number of
/// wins handed out, so the result sums to 1.0 unless it is empty.
pub fn win_rate(table: &EventTable) -> BTreeMap<String, f64> {
    // prompt -> (best rating, backends at that rating)
    let mut groups: HashMap<&str, (u8, BTreeSet<&str>)> = HashMap::new();

    for ev in table {
        let Some(rating) = ev.rating else { continue };
        let rating = rating.get();
        let entry = groups
            .entry(ev.prompt.as_str())
            .or_insert_with(|| (rating, BTreeSet::new()));

        if rating > entry.0 {
            entry.0 = rating;
            entry.1.clear();
        }
        if rating == entry.0 {
            entry.1.insert(ev.backend_id.as_str());
        }
    }

    let mut wins: BTreeMap<&str, u64> = BTreeMap::new();
    for (_, winners) in groups.values() {
        for backend in winners {
            *wins.entry(*backend).or_default() += 1;
        }
    }

    let total: u64 = wins.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    wins.into_iter()
        .map(|(backend, n)| (backend.to_string(), n as f64 / total as f64))
        .collect()
}
