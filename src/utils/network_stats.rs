use crate::models::ValidatorSummary;
use std::cmp::Ordering;

const SUPERMINORITY_PERCENT: i128 = 33;

/// Smallest number of top-staked validators holding at least 33% of the
/// total stake. Equal stakes are ordered by vote pubkey so the result does
/// not depend on input order.
pub fn superminority_count(validators: &[ValidatorSummary]) -> usize {
    let total: i128 = validators.iter().map(|v| v.activated_stake as i128).sum();

    let mut sorted: Vec<&ValidatorSummary> = validators.iter().collect();
    sorted.sort_by(|a, b| match b.activated_stake.cmp(&a.activated_stake) {
        Ordering::Equal => a.vote_pubkey.cmp(&b.vote_pubkey),
        other => other,
    });

    let mut cumulative: i128 = 0;
    let mut count = 0;
    for validator in sorted {
        cumulative += validator.activated_stake as i128;
        count += 1;
        if cumulative * 100 >= total * SUPERMINORITY_PERCENT {
            break;
        }
    }
    count
}

pub fn total_stake(validators: &[ValidatorSummary]) -> u128 {
    validators.iter().map(|v| v.activated_stake as u128).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validators(stakes: &[u64]) -> Vec<ValidatorSummary> {
        stakes
            .iter()
            .enumerate()
            .map(|(i, stake)| ValidatorSummary {
                activated_stake: *stake,
                commission: 0.0,
                vote_pubkey: format!("Vote{:02}", i),
                delegator_count: 0,
                ll: None,
                moniker: String::new(),
                version: String::new(),
                last_vote: 0,
                picture_url: None,
            })
            .collect()
    }

    #[test]
    fn single_large_validator_is_superminority() {
        assert_eq!(superminority_count(&validators(&[50, 30, 20])), 1);
    }

    #[test]
    fn equal_stakes_need_four_of_ten() {
        assert_eq!(superminority_count(&validators(&[10; 10])), 4);
    }

    #[test]
    fn order_of_input_does_not_matter() {
        assert_eq!(superminority_count(&validators(&[5, 20, 1, 40, 34])), 1);
        assert_eq!(superminority_count(&validators(&[1, 20, 20, 20, 19, 20])), 2);
    }

    #[test]
    fn empty_and_zero_stake_sets() {
        assert_eq!(superminority_count(&[]), 0);
        assert_eq!(superminority_count(&validators(&[0, 0])), 1);
        assert_eq!(total_stake(&validators(&[u64::MAX, u64::MAX])), 2 * u64::MAX as u128);
    }
}
