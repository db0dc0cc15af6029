//! # Staff Performance
//!
//! Running sales counters and the blended performance score.
//!
//! ## Score Blending
//! ```text
//! achievement = newMonthlySales / monthlyTarget × 100     (capped at 100)
//! newScore    = round(clamp(0, 100, current × 0.7 + achievement × 0.3))
//! ```
//! A target of zero counts as fully achieved once the employee has any
//! sales this month.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Employee;
use crate::PERFORMANCE_HISTORY_WEIGHT;

/// Fields written back to the employee document after a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesCredit {
    pub monthly_sales: Money,
    pub total_sales: Money,
    pub total_commission: Money,
    pub performance_score: f64,
}

/// Percentage of the monthly target reached, capped at 100.
pub fn target_achievement(monthly_sales: Money, monthly_target: Money) -> f64 {
    if !monthly_target.is_positive() {
        return if monthly_sales.is_positive() { 100.0 } else { 0.0 };
    }
    (monthly_sales.units() as f64 / monthly_target.units() as f64 * 100.0).min(100.0)
}

/// Blends the previous score with the new target achievement.
///
/// ## Example
/// ```rust
/// use loom_core::money::Money;
/// use loom_core::performance::blend_score;
///
/// // 60000 of 50000 → achievement capped at 100
/// let score = blend_score(75.0, Money::from_units(60000), Money::from_units(50000));
/// assert_eq!(score, 83.0);
/// ```
pub fn blend_score(current: f64, monthly_sales: Money, monthly_target: Money) -> f64 {
    let achievement = target_achievement(monthly_sales, monthly_target);
    let current = if current.is_finite() { current } else { 0.0 };
    let blended = current * PERFORMANCE_HISTORY_WEIGHT
        + achievement * (1.0 - PERFORMANCE_HISTORY_WEIGHT);
    blended.clamp(0.0, 100.0).round()
}

/// Credits a sale of `sale_total` to `employee`.
pub fn credit_sale(employee: &Employee, sale_total: Money) -> SalesCredit {
    let monthly_sales = employee.monthly_sales + sale_total;
    let commission = sale_total.percentage_of(employee.commission_rate);

    SalesCredit {
        monthly_sales,
        total_sales: employee.total_sales + sale_total,
        total_commission: employee.total_commission + commission,
        performance_score: blend_score(
            employee.performance_score,
            monthly_sales,
            employee.monthly_target,
        ),
    }
}
