//! Pricing snapshot frozen at CreateIntent time (spec §4.1, §6).
//!
//! Stored as a JSON-ish structured column so the snapshot survives schema
//! evolution; modeled here as a typed struct rather than a loose map so the
//! orchestrator never has to guess at field names when reading it back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct SeatPrice {
    pub seat_id: Uuid,
    pub seat_number: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct BusLegPrice {
    pub scheduled_trip_id: Uuid,
    pub seats: Vec<SeatPrice>,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct LoungeLegPrice {
    pub lounge_id: Uuid,
    pub pricing_type: String,
    pub guests_count: i32,
    pub price_per_guest: Decimal,
    pub pre_order_total: Decimal,
    pub subtotal: Decimal,
}

/// Authoritative for the whole purchase flow; never recomputed at confirm.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
pub struct PricingSnapshot {
    pub bus: Option<BusLegPrice>,
    pub pre_lounge: Option<LoungeLegPrice>,
    pub post_lounge: Option<LoungeLegPrice>,
    pub currency: String,
    pub total: Decimal,
}

impl PricingSnapshot {
    pub fn compute_total(&self) -> Decimal {
        let bus = self.bus.as_ref().map(|b| b.subtotal).unwrap_or(Decimal::ZERO);
        let pre = self
            .pre_lounge
            .as_ref()
            .map(|l| l.subtotal)
            .unwrap_or(Decimal::ZERO);
        let post = self
            .post_lounge
            .as_ref()
            .map(|l| l.subtotal)
            .unwrap_or(Decimal::ZERO);
        bus + pre + post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_sum_of_present_legs() {
        let snapshot = PricingSnapshot {
            bus: Some(BusLegPrice {
                scheduled_trip_id: Uuid::nil(),
                seats: vec![],
                subtotal: Decimal::new(40000, 2),
            }),
            pre_lounge: Some(LoungeLegPrice {
                lounge_id: Uuid::nil(),
                pricing_type: "2_hours".into(),
                guests_count: 2,
                price_per_guest: Decimal::new(30000, 2),
                pre_order_total: Decimal::ZERO,
                subtotal: Decimal::new(60000, 2),
            }),
            post_lounge: None,
            currency: "LKR".into(),
            total: Decimal::ZERO,
        };
        assert_eq!(snapshot.compute_total(), Decimal::new(100000, 2));
    }

    #[test]
    fn total_is_zero_with_no_legs() {
        let snapshot = PricingSnapshot {
            bus: None,
            pre_lounge: None,
            post_lounge: None,
            currency: "LKR".into(),
            total: Decimal::ZERO,
        };
        assert_eq!(snapshot.compute_total(), Decimal::ZERO);
    }
}
