//! Leaderboard ordering

use crate::types::Asset;

/// Orders assets by pain score, highest first, and assigns dense 1-based ranks
///
/// The sort is stable: assets with equal scores keep the provider's order.
pub fn rank_assets(mut assets: Vec<Asset>) -> Vec<Asset> {
    assets.sort_by(|a, b| b.pain_score.cmp(&a.pain_score));
    for (index, asset) in assets.iter_mut().enumerate() {
        asset.rank = index as u32 + 1;
    }
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn asset(id: &str, pain_score: u8) -> Asset {
        Asset {
            rank: 0,
            id: id.to_string(),
            name: id.to_string(),
            symbol: id.to_string(),
            price: 1.0,
            percent_from_ath: 0.0,
            pain_score,
            logo_url: String::new(),
        }
    }

    #[test]
    fn test_rank_assets() {
        let ranked = rank_assets(vec![asset("a", 10), asset("b", 56), asset("c", 33)]);

        let order: Vec<_> = ranked.iter().map(|a| (a.rank, a.id.as_str())).collect();
        assert_eq!(order, vec![(1, "b"), (2, "c"), (3, "a")]);
    }

    #[test]
    fn test_ties_keep_provider_order() {
        let ranked = rank_assets(vec![
            asset("first", 20),
            asset("top", 90),
            asset("second", 20),
            asset("third", 20),
        ]);

        let ids: Vec<_> = ranked.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_empty() {
        assert!(rank_assets(Vec::new()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_dense_descending_stable(scores in proptest::collection::vec(0u8..=100, 0..60)) {
            let assets: Vec<_> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| asset(&i.to_string(), *s))
                .collect();

            let ranked = rank_assets(assets);

            prop_assert_eq!(ranked.len(), scores.len());
            for (i, a) in ranked.iter().enumerate() {
                prop_assert_eq!(a.rank as usize, i + 1);
            }
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].pain_score >= pair[1].pain_score);
                if pair[0].pain_score == pair[1].pain_score {
                    let lhs: usize = pair[0].id.parse().unwrap();
                    let rhs: usize = pair[1].id.parse().unwrap();
                    prop_assert!(lhs < rhs);
                }
            }
        }
    }
}
