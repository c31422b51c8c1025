//! Standard competition ranking ("1224").
//!
//! Tied scores share a rank and the next distinct score resumes at the number
//! of entities strictly ahead of it plus one, so `[92, 92, 85, 78]` ranks as
//! `[1, 1, 3, 4]`. Equality is exact on the decimal value (`85.0 == 85.00`);
//! callers that want fuzzy ties round scores before ranking.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry<K> {
    pub entity_id: K,
    pub score: Decimal,
    pub rank: u32,
}

/// Ranks every entity, highest score first.
///
/// Entries come back in rank order; entities sharing a rank are ordered by id
/// so output is deterministic.
pub fn rank_ordered<K>(scores: &HashMap<K, Decimal>) -> Vec<RankEntry<K>>
where
    K: Clone + Ord + Hash,
{
    let mut sorted: Vec<(&K, Decimal)> = scores.iter().map(|(k, v)| (k, *v)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut out: Vec<RankEntry<K>> = Vec::with_capacity(sorted.len());
    for (position, (entity_id, score)) in sorted.into_iter().enumerate() {
        let rank = match out.last() {
            Some(prev) if prev.score == score => prev.rank,
            _ => (position + 1) as u32,
        };
        out.push(RankEntry {
            entity_id: entity_id.clone(),
            score,
            rank,
        });
    }
    out
}

/// Ranks every entity and indexes the result by entity id.
pub fn rank<K>(scores: &HashMap<K, Decimal>) -> HashMap<K, RankEntry<K>>
where
    K: Clone + Ord + Hash,
{
    rank_ordered(scores)
        .into_iter()
        .map(|e| (e.entity_id.clone(), e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal")
    }

    fn scores(pairs: &[(&str, &str)]) -> HashMap<String, Decimal> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), d(v)))
            .collect()
    }

    fn ranks_of(ranked: &HashMap<String, RankEntry<String>>, id: &str) -> u32 {
        ranked.get(id).map(|e| e.rank).expect("entity ranked")
    }

    #[test]
    fn ties_share_rank_and_next_rank_skips() {
        let ranked = rank(&scores(&[("s1", "85"), ("s2", "92"), ("s3", "78"), ("s4", "92")]));
        assert_eq!(ranks_of(&ranked, "s2"), 1);
        assert_eq!(ranks_of(&ranked, "s4"), 1);
        assert_eq!(ranks_of(&ranked, "s1"), 3);
        assert_eq!(ranks_of(&ranked, "s3"), 4);
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(rank::<String>(&HashMap::new()).is_empty());
        let ranked = rank(&scores(&[("only", "12.5")]));
        assert_eq!(ranks_of(&ranked, "only"), 1);
    }

    #[test]
    fn equality_is_by_value_not_representation() {
        let ranked = rank(&scores(&[("a", "85.0"), ("b", "85.00"), ("c", "84.999")]));
        assert_eq!(ranks_of(&ranked, "a"), 1);
        assert_eq!(ranks_of(&ranked, "b"), 1);
        assert_eq!(ranks_of(&ranked, "c"), 3);
    }

    #[test]
    fn trailing_tie_block() {
        let ordered = rank_ordered(&scores(&[("a", "90"), ("b", "70"), ("c", "70"), ("d", "70")]));
        let ranks: Vec<u32> = ordered.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 2]);
        let ids: Vec<&str> = ordered.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn all_tied() {
        let ordered = rank_ordered(&scores(&[("x", "50"), ("y", "50"), ("z", "50")]));
        assert!(ordered.iter().all(|e| e.rank == 1));
    }

    #[test]
    fn works_with_numeric_ids() {
        let input: HashMap<u64, Decimal> = [(7_u64, d("3")), (3, d("9")), (5, d("3"))]
            .into_iter()
            .collect();
        let ordered = rank_ordered(&input);
        let pairs: Vec<(u64, u32)> = ordered.iter().map(|e| (e.entity_id, e.rank)).collect();
        assert_eq!(pairs, vec![(3, 1), (5, 2), (7, 2)]);
    }
}
