use super::tiers::{RangeOp, TierBucket, MAX_DIFFERENTIALS};

/// Validate a configured tier table.
/// Returns all validation errors at once (not just the first).
pub fn validate_tiers(tiers: &[TierBucket]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if tiers.is_empty() {
        errors.push("tiers: must contain at least one entry".to_string());
    }

    for (i, bucket) in tiers.iter().enumerate() {
        if bucket.count > MAX_DIFFERENTIALS {
            errors.push(format!(
                "tiers[{}].use: {} exceeds the maximum of {}",
                i, bucket.count, MAX_DIFFERENTIALS
            ));
        }

        if let Err(e) = RangeOp::parse(&bucket.range) {
            errors.push(format!(
                "tiers[{}].range: invalid '{}' - {}",
                i, bucket.range, e
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
