//! # Reports
//!
//! Stateless aggregates over whole collections. Every function takes the
//! current documents and recomputes from scratch; nothing is cached.
//!
//! ## Where Each Aggregate Is Shown
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboard ────► dashboard_summary                                      │
//! │  Reports   ────► daily_sales, top_products, payment_breakdown,          │
//! │                  profit_summary, inventory_valuation                    │
//! │  Ledgers   ────► ledger_summary                                         │
//! │  Bargains  ────► bargain_stats                                          │
//! │  Disposal  ────► disposal_stats                                         │
//! │  Sales     ────► filter_sales, sales_totals                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{
    BargainRecord, BargainStatus, DeliveryStatus, DisposalCondition, DisposalMethod,
    DisposalRecord, Employee, LedgerEntry, LedgerStatus, PaymentMethod, PaymentStatus, Product,
    SaleRecord,
};

/// How many recent sales the dashboard lists.
pub const RECENT_SALES_LIMIT: usize = 5;

fn sale_date(sale: &SaleRecord) -> Option<NaiveDate> {
    sale.created_at.map(|t| t.date_naive())
}

/// Newest first; undated sales sort last.
pub fn sort_newest_first(sales: &mut [SaleRecord]) {
    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    pub today_revenue: Money,
    pub today_sales_count: usize,
    pub total_revenue: Money,
    pub total_sales_count: usize,
    pub total_products: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub active_employees: usize,
    pub receivables_outstanding: Money,
    pub payables_outstanding: Money,
    pub recent_sales: Vec<SaleRecord>,
}

/// Input collections for the dashboard, fetched wholesale by the caller.
pub struct DashboardInput<'a> {
    pub products: &'a [Product],
    pub sales: &'a [SaleRecord],
    pub employees: &'a [Employee],
    pub credits: &'a [LedgerEntry],
    pub debits: &'a [LedgerEntry],
}

pub fn dashboard_summary(input: &DashboardInput<'_>, today: NaiveDate) -> DashboardSummary {
    let todays: Vec<&SaleRecord> = input
        .sales
        .iter()
        .filter(|s| sale_date(s) == Some(today))
        .collect();

    let mut recent = input.sales.to_vec();
    sort_newest_first(&mut recent);
    recent.truncate(RECENT_SALES_LIMIT);

    DashboardSummary {
        today_revenue: todays.iter().map(|s| s.total).sum(),
        today_sales_count: todays.len(),
        total_revenue: input.sales.iter().map(|s| s.total).sum(),
        total_sales_count: input.sales.len(),
        total_products: input.products.len(),
        low_stock_count: input.products.iter().filter(|p| p.is_low_stock()).count(),
        out_of_stock_count: input.products.iter().filter(|p| p.is_out_of_stock()).count(),
        active_employees: input.employees.iter().filter(|e| e.is_active()).count(),
        receivables_outstanding: input.credits.iter().map(|e| e.remaining_amount).sum(),
        payables_outstanding: input.debits.iter().map(|e| e.remaining_amount).sum(),
        recent_sales: recent,
    }
}

// =============================================================================
// Sales Over Time
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub revenue: Money,
    pub count: usize,
}

/// One bucket per day for the `days` days ending `today`, oldest first.
/// Days without sales are present with zero revenue.
pub fn daily_sales(sales: &[SaleRecord], today: NaiveDate, days: u32) -> Vec<DailySales> {
    (0..days as i64)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let on_day: Vec<&SaleRecord> = sales
                .iter()
                .filter(|s| sale_date(s) == Some(date))
                .collect();
            DailySales {
                date,
                revenue: on_day.iter().map(|s| s.total).sum(),
                count: on_day.len(),
            }
        })
        .collect()
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopProduct {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub revenue: Money,
}

/// Best sellers by revenue after line discounts.
pub fn top_products(sales: &[SaleRecord], limit: usize) -> Vec<TopProduct> {
    let mut by_product: HashMap<&str, TopProduct> = HashMap::new();
    for item in sales.iter().flat_map(|s| s.items.iter()) {
        let entry = by_product
            .entry(item.product_id.as_str())
            .or_insert_with(|| TopProduct {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                quantity: 0,
                revenue: Money::zero(),
            });
        entry.quantity += item.quantity;
        entry.revenue += item.net_total();
    }

    let mut ranked: Vec<TopProduct> = by_product.into_values().collect();
    ranked.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| b.quantity.cmp(&a.quantity))
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryValuation {
    pub total_units: i64,
    pub cost_value: Money,
    pub retail_value: Money,
    pub potential_profit: Money,
}

pub fn inventory_valuation(products: &[Product]) -> InventoryValuation {
    let cost_value: Money = products.iter().map(Product::stock_cost_value).sum();
    let retail_value: Money = products.iter().map(Product::stock_retail_value).sum();
    InventoryValuation {
        total_units: products.iter().map(|p| p.stock.max(0)).sum(),
        cost_value,
        retail_value,
        potential_profit: retail_value - cost_value,
    }
}

// =============================================================================
// Payments and Profit
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub count: usize,
    pub total: Money,
    pub percentage: f64,
}

/// Share of revenue per payment method, largest first.
pub fn payment_breakdown(sales: &[SaleRecord]) -> Vec<PaymentBreakdown> {
    let grand: Money = sales.iter().map(|s| s.total).sum();
    let mut by_method: Vec<PaymentBreakdown> = Vec::new();
    for sale in sales {
        match by_method.iter_mut().find(|b| b.method == sale.payment_method) {
            Some(b) => {
                b.count += 1;
                b.total += sale.total;
            }
            None => by_method.push(PaymentBreakdown {
                method: sale.payment_method,
                count: 1,
                total: sale.total,
                percentage: 0.0,
            }),
        }
    }
    for b in &mut by_method {
        b.percentage = b.total.ratio_percent(grand);
    }
    by_method.sort_by(|a, b| b.total.cmp(&a.total));
    by_method
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfitSummary {
    /// Net of discounts, excluding tax.
    pub revenue: Money,
    /// Purchase cost of the goods sold, at today's recorded cost.
    pub cost_of_goods: Money,
    pub gross_profit: Money,
    pub margin_percentage: f64,
}

/// Gross profit. Lines whose product has since been deleted count at zero cost.
pub fn profit_summary(sales: &[SaleRecord], products: &[Product]) -> ProfitSummary {
    let cost_of: HashMap<&str, Money> = products
        .iter()
        .map(|p| (p.id.as_str(), p.purchase_cost))
        .collect();

    let revenue: Money = sales.iter().map(SaleRecord::net_revenue).sum();
    let cost_of_goods: Money = sales
        .iter()
        .flat_map(|s| s.items.iter())
        .map(|i| {
            cost_of
                .get(i.product_id.as_str())
                .copied()
                .unwrap_or_default()
                * i.quantity
        })
        .sum();
    let gross_profit = revenue - cost_of_goods;

    ProfitSummary {
        revenue,
        cost_of_goods,
        gross_profit,
        margin_percentage: gross_profit.ratio_percent(revenue),
    }
}

/// Everything on the Reports screen in one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportBundle {
    pub daily_sales: Vec<DailySales>,
    pub top_products: Vec<TopProduct>,
    pub payment_breakdown: Vec<PaymentBreakdown>,
    pub profit: ProfitSummary,
    pub inventory: InventoryValuation,
}

pub fn report_bundle(
    sales: &[SaleRecord],
    products: &[Product],
    today: NaiveDate,
    days: u32,
    top: usize,
) -> ReportBundle {
    ReportBundle {
        daily_sales: daily_sales(sales, today, days),
        top_products: top_products(sales, top),
        payment_breakdown: payment_breakdown(sales),
        profit: profit_summary(sales, products),
        inventory: inventory_valuation(products),
    }
}

// =============================================================================
// Ledger
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerSummary {
    pub total_entries: usize,
    pub total_amount: Money,
    pub total_paid: Money,
    pub total_outstanding: Money,
    pub pending: usize,
    pub partial: usize,
    pub paid: usize,
    pub overdue: usize,
    /// Outstanding on entries past their due date.
    pub overdue_amount: Money,
}

/// Status counts use [`LedgerEntry::effective_status`], so an unpaid entry
/// past due counts as overdue rather than pending/partial.
pub fn ledger_summary(entries: &[LedgerEntry], today: NaiveDate) -> LedgerSummary {
    let mut summary = LedgerSummary {
        total_entries: entries.len(),
        total_amount: Money::zero(),
        total_paid: Money::zero(),
        total_outstanding: Money::zero(),
        pending: 0,
        partial: 0,
        paid: 0,
        overdue: 0,
        overdue_amount: Money::zero(),
    };

    for entry in entries {
        summary.total_amount += entry.amount;
        summary.total_paid += entry.paid_amount;
        summary.total_outstanding += entry.remaining_amount;
        match entry.effective_status(today) {
            LedgerStatus::Pending => summary.pending += 1,
            LedgerStatus::Partial => summary.partial += 1,
            LedgerStatus::Paid => summary.paid += 1,
            LedgerStatus::Overdue => {
                summary.overdue += 1;
                summary.overdue_amount += entry.remaining_amount;
            }
        }
    }

    summary
}

// =============================================================================
// Bargaining
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StaffDiscount {
    pub staff_id: String,
    pub staff_name: String,
    pub count: usize,
    pub total_discount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BargainStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Discount given away on approved bargains.
    pub total_discount: Money,
    pub average_discount_percentage: f64,
    pub by_staff: Vec<StaffDiscount>,
}

pub fn bargain_stats(records: &[BargainRecord]) -> BargainStats {
    let count = |status: BargainStatus| records.iter().filter(|r| r.status == status).count();
    let approved: Vec<&BargainRecord> = records
        .iter()
        .filter(|r| r.status == BargainStatus::Approved)
        .collect();

    let average = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.discount_percentage).sum::<f64>() / records.len() as f64
    };

    let mut by_staff: Vec<StaffDiscount> = Vec::new();
    for r in &approved {
        match by_staff.iter_mut().find(|s| s.staff_id == r.staff_id) {
            Some(s) => {
                s.count += 1;
                s.total_discount += r.discount_amount;
            }
            None => by_staff.push(StaffDiscount {
                staff_id: r.staff_id.clone(),
                staff_name: r.staff_name.clone(),
                count: 1,
                total_discount: r.discount_amount,
            }),
        }
    }
    by_staff.sort_by(|a, b| b.total_discount.cmp(&a.total_discount));

    BargainStats {
        total: records.len(),
        pending: count(BargainStatus::Pending),
        approved: approved.len(),
        rejected: count(BargainStatus::Rejected),
        total_discount: approved.iter().map(|r| r.discount_amount).sum(),
        average_discount_percentage: average,
        by_staff,
    }
}

// =============================================================================
// Disposal
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConditionTotal {
    pub condition: DisposalCondition,
    pub count: usize,
    pub quantity: i64,
    pub loss: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MethodTotal {
    pub method: DisposalMethod,
    pub count: usize,
    pub recovered: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DisposalStats {
    pub total_records: usize,
    pub total_quantity: i64,
    pub original_value: Money,
    pub recovered_value: Money,
    pub total_loss: Money,
    pub by_condition: Vec<ConditionTotal>,
    pub by_method: Vec<MethodTotal>,
}

pub fn disposal_stats(records: &[DisposalRecord]) -> DisposalStats {
    let mut by_condition: Vec<ConditionTotal> = Vec::new();
    let mut by_method: Vec<MethodTotal> = Vec::new();

    for r in records {
        match by_condition.iter_mut().find(|c| c.condition == r.condition) {
            Some(c) => {
                c.count += 1;
                c.quantity += r.quantity;
                c.loss += r.loss_amount;
            }
            None => by_condition.push(ConditionTotal {
                condition: r.condition,
                count: 1,
                quantity: r.quantity,
                loss: r.loss_amount,
            }),
        }
        match by_method.iter_mut().find(|m| m.method == r.method) {
            Some(m) => {
                m.count += 1;
                m.recovered += r.disposal_value;
            }
            None => by_method.push(MethodTotal {
                method: r.method,
                count: 1,
                recovered: r.disposal_value,
            }),
        }
    }

    by_condition.sort_by(|a, b| b.loss.cmp(&a.loss));
    by_method.sort_by(|a, b| b.count.cmp(&a.count));

    DisposalStats {
        total_records: records.len(),
        total_quantity: records.iter().map(|r| r.quantity).sum(),
        original_value: records.iter().map(DisposalRecord::original_value).sum(),
        recovered_value: records.iter().map(|r| r.disposal_value).sum(),
        total_loss: records.iter().map(|r| r.loss_amount).sum(),
        by_condition,
        by_method,
    }
}

// =============================================================================
// Sales Ledger
// =============================================================================

/// Filters on the Sales Ledger screen. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesFilter {
    /// Inclusive start day.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub from: Option<NaiveDate>,
    /// Inclusive end day.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub delivery_status: Option<DeliveryStatus>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl SalesFilter {
    pub fn matches(&self, sale: &SaleRecord) -> bool {
        let date = sale_date(sale);
        if let Some(from) = self.from {
            if date.map_or(true, |d| d < from) {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date.map_or(true, |d| d > to) {
                return false;
            }
        }
        if self.payment_status.is_some_and(|s| s != sale.payment_status) {
            return false;
        }
        if self.delivery_status.is_some_and(|s| s != sale.delivery_status) {
            return false;
        }
        if self.payment_method.is_some_and(|m| m != sale.payment_method) {
            return false;
        }
        if let Some(staff) = self.staff_id.as_deref() {
            if !staff.is_empty() && staff != sale.staff_id {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(needle) => sale.matches_search(needle),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesTotals {
    pub count: usize,
    pub items_sold: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

/// Matching sales, newest first.
pub fn filter_sales(sales: &[SaleRecord], filter: &SalesFilter) -> Vec<SaleRecord> {
    let mut matching: Vec<SaleRecord> = sales.iter().filter(|s| filter.matches(s)).cloned().collect();
    sort_newest_first(&mut matching);
    matching
}

pub fn sales_totals(sales: &[SaleRecord]) -> SalesTotals {
    SalesTotals {
        count: sales.len(),
        items_sold: sales.iter().map(SaleRecord::total_quantity).sum(),
        subtotal: sales.iter().map(|s| s.subtotal).sum(),
        discount: sales.iter().map(|s| s.discount).sum(),
        tax: sales.iter().map(|s| s.tax).sum(),
        total: sales.iter().map(|s| s.total).sum(),
    }
}

/// `today` in UTC; the server passes this so tests can pin the clock.
pub fn today(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::disposal::fixtures::disposal;
    use crate::types::employee::fixtures::employee;
    use crate::types::ledger::fixtures::entry;
    use crate::types::product::fixtures::product;
    use crate::types::SaleItem;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn sale(id: &str, when: DateTime<Utc>, method: PaymentMethod, lines: &[(&str, i64, i64)]) -> SaleRecord {
        let items: Vec<SaleItem> = lines
            .iter()
            .map(|(pid, qty, price)| SaleItem {
                product_id: pid.to_string(),
                product_name: format!("Product {}", pid),
                product_code: String::new(),
                quantity: *qty,
                original_price: Money::from_units(*price),
                final_price: *price as f64,
                discount: Money::zero(),
            })
            .collect();
        let subtotal: Money = items.iter().map(SaleItem::gross_total).sum();
        SaleRecord {
            id: id.to_string(),
            invoice_number: format!("INV-{}", id),
            items,
            subtotal,
            discount: Money::zero(),
            tax: Money::zero(),
            total: subtotal,
            payment_method: method,
            payment_status: PaymentStatus::Paid,
            delivery_status: DeliveryStatus::Pickup,
            customer_name: format!("Customer {}", id),
            customer_phone: String::new(),
            customer_address: String::new(),
            staff_id: "e1".to_string(),
            staff_name: "Staff e1".to_string(),
            notes: String::new(),
            created_at: Some(when),
            updated_at: None,
        }
    }

    #[test]
    fn test_dashboard_summary() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let sales = vec![
            sale("a", at(2026, 3, 10), PaymentMethod::Cash, &[("p1", 1, 1000)]),
            sale("b", at(2026, 3, 9), PaymentMethod::Card, &[("p2", 2, 500)]),
        ];
        let products = vec![product("p1", 1000, 0), product("p2", 500, 1), product("p3", 100, 50)];
        let employees = vec![employee("e1", 0.0, 0, 0)];
        let credits = vec![entry(5000, 1000)];
        let debits = vec![entry(2000, 0)];

        let summary = dashboard_summary(
            &DashboardInput {
                products: &products,
                sales: &sales,
                employees: &employees,
                credits: &credits,
                debits: &debits,
            },
            today,
        );

        assert_eq!(summary.today_revenue.units(), 1000);
        assert_eq!(summary.today_sales_count, 1);
        assert_eq!(summary.total_revenue.units(), 2000);
        assert_eq!(summary.out_of_stock_count, 1);
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.receivables_outstanding.units(), 4000);
        assert_eq!(summary.payables_outstanding.units(), 2000);
        assert_eq!(summary.recent_sales[0].id, "a");
    }

    #[test]
    fn test_daily_sales_fills_empty_days() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let sales = vec![
            sale("a", at(2026, 3, 10), PaymentMethod::Cash, &[("p1", 1, 100)]),
            sale("b", at(2026, 3, 10), PaymentMethod::Cash, &[("p1", 1, 50)]),
            sale("c", at(2026, 3, 4), PaymentMethod::Cash, &[("p1", 1, 70)]),
            sale("old", at(2026, 3, 3), PaymentMethod::Cash, &[("p1", 1, 999)]),
        ];

        let days = daily_sales(&sales, today, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(days[0].revenue.units(), 70);
        assert_eq!(days[6].revenue.units(), 150);
        assert_eq!(days[6].count, 2);
        assert_eq!(days[3].count, 0);
    }

    #[test]
    fn test_top_products_and_breakdown() {
        let sales = vec![
            sale("a", at(2026, 3, 1), PaymentMethod::Cash, &[("p1", 1, 1000), ("p2", 3, 100)]),
            sale("b", at(2026, 3, 2), PaymentMethod::Card, &[("p2", 2, 100)]),
        ];

        let top = top_products(&sales, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, "p1");

        let breakdown = payment_breakdown(&sales);
        assert_eq!(breakdown[0].method, PaymentMethod::Cash);
        assert_eq!(breakdown[0].total.units(), 1300);
        assert!((breakdown[0].percentage - 86.666).abs() < 0.01);
        assert_eq!(breakdown[1].count, 1);
    }

    #[test]
    fn test_profit_summary() {
        let sales = vec![sale("a", at(2026, 3, 1), PaymentMethod::Cash, &[("p1", 2, 1000)])];
        let products = vec![product("p1", 1000, 5)];

        let profit = profit_summary(&sales, &products);
        assert_eq!(profit.revenue.units(), 2000);
        assert_eq!(profit.cost_of_goods.units(), 1200);
        assert_eq!(profit.gross_profit.units(), 800);
        assert_eq!(profit.margin_percentage, 40.0);
    }

    #[test]
    fn test_ledger_summary_counts_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut late = entry(3000, 1000);
        late.due_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        let entries = vec![entry(5000, 0), late, entry(1000, 1000)];

        let s = ledger_summary(&entries, today);
        assert_eq!(s.total_entries, 3);
        assert_eq!(s.total_amount.units(), 9000);
        assert_eq!(s.total_outstanding.units(), 7000);
        assert_eq!((s.pending, s.partial, s.paid, s.overdue), (1, 0, 1, 1));
        assert_eq!(s.overdue_amount.units(), 2000);
    }

    #[test]
    fn test_disposal_stats() {
        let records = vec![
            disposal(1500, 2, 200, DisposalCondition::Damaged, DisposalMethod::SoldAsScrap),
            disposal(100, 1, 0, DisposalCondition::Damaged, DisposalMethod::Discard),
            disposal(300, 3, 0, DisposalCondition::Expired, DisposalMethod::Discard),
        ];
        let s = disposal_stats(&records);
        assert_eq!(s.total_quantity, 6);
        assert_eq!(s.total_loss.units(), 2800 + 100 + 900);
        assert_eq!(s.recovered_value.units(), 200);
        assert_eq!(s.by_condition[0].condition, DisposalCondition::Damaged);
        assert_eq!(s.by_condition[0].count, 2);
        assert_eq!(s.by_method[0].method, DisposalMethod::Discard);
    }

    #[test]
    fn test_filter_sales() {
        let mut pending = sale("b", at(2026, 3, 5), PaymentMethod::Cash, &[("p1", 1, 10)]);
        pending.delivery_status = DeliveryStatus::Pending;
        let sales = vec![
            sale("a", at(2026, 3, 1), PaymentMethod::Cash, &[("p1", 1, 10)]),
            pending,
            sale("c", at(2026, 3, 9), PaymentMethod::Card, &[("p1", 4, 10)]),
        ];

        let filter = SalesFilter {
            from: NaiveDate::from_ymd_opt(2026, 3, 2),
            to: NaiveDate::from_ymd_opt(2026, 3, 9),
            ..Default::default()
        };
        let found = filter_sales(&sales, &filter);
        assert_eq!(found.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["c", "b"]);

        let filter = SalesFilter {
            delivery_status: Some(DeliveryStatus::Pending),
            ..Default::default()
        };
        assert_eq!(filter_sales(&sales, &filter).len(), 1);

        let filter = SalesFilter {
            search: Some("customer c".to_string()),
            ..Default::default()
        };
        let found = filter_sales(&sales, &filter);
        assert_eq!(found.len(), 1);

        let totals = sales_totals(&sales);
        assert_eq!(totals.items_sold, 6);
        assert_eq!(totals.total.units(), 60);
    }
}
