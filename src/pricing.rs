//! License pricing.
//!
//! Prices come from a volume-discount schedule: the highest tier
//! whose minimum does not exceed the user count applies to every
//! user.

use crate::config::PricingTier;

/// Returns the per-user price for `users` users.
///
/// Tiers are scanned from the highest minimum down; a user count
/// equal to a tier's minimum selects that tier.  Counts below every
/// minimum fall back to the first tier, and an empty schedule prices
/// at zero.
pub fn resolve_price_per_user(tiers: &[PricingTier], users: f64) -> f64 {
    tiers
        .iter()
        .rev()
        .find(|tier| users >= tier.min_users)
        .or_else(|| tiers.first())
        .map(|tier| tier.price)
        .unwrap_or(0.0)
}

/// Annual license cost, unrounded.
pub fn license_cost(tiers: &[PricingTier], users: f64) -> f64 {
    users * resolve_price_per_user(tiers, users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculatorConfig;

    fn tiers() -> Vec<PricingTier> {
        CalculatorConfig::builtin().pricing_tiers
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let tiers = tiers();
        assert_eq!(resolve_price_per_user(&tiers, 499.0), 19.13);
        assert_eq!(resolve_price_per_user(&tiers, 500.0), 13.00);
        assert_eq!(resolve_price_per_user(&tiers, 800.0), 10.00);
        assert_eq!(resolve_price_per_user(&tiers, 1000.0), 8.83);
        assert_eq!(resolve_price_per_user(&tiers, 2000.0), 6.00);
        assert_eq!(resolve_price_per_user(&tiers, 10000.0), 3.60);
    }

    #[test]
    fn test_zero_and_negative_users_use_floor_tier() {
        let tiers = tiers();
        assert_eq!(resolve_price_per_user(&tiers, 0.0), 19.13);
        assert_eq!(resolve_price_per_user(&tiers, -5.0), 19.13);
        assert_eq!(resolve_price_per_user(&tiers, f64::NAN), 19.13);
        assert_eq!(resolve_price_per_user(&[], 100.0), 0.0);
    }

    #[test]
    fn test_price_never_increases_with_scale() {
        let tiers = tiers();
        let mut previous = f64::INFINITY;
        for users in (0..=12_000).step_by(25) {
            let price = resolve_price_per_user(&tiers, users as f64);
            assert!(price <= previous, "price rose at {users} users");
            previous = price;
        }
    }

    #[test]
    fn test_license_cost() {
        let tiers = tiers();
        assert!((license_cost(&tiers, 100.0) - 1913.0).abs() < 1e-9);
        assert_eq!(license_cost(&tiers, 2000.0), 12000.0);
    }
}
