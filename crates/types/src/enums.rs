use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Passenger,
    BusOwner,
    Driver,
    Conductor,
    LoungeOperator,
    Admin,
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bus_owner" => Ok(Self::BusOwner),
            "driver" => Ok(Self::Driver),
            "conductor" => Ok(Self::Conductor),
            "lounge_operator" => Ok(Self::LoungeOperator),
            "admin" => Ok(Self::Admin),
            "passenger" | _ => Ok(Self::Passenger),
        }
    }
}

/// Purchase shape for a BookingIntent — which legs it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    #[default]
    BusOnly,
    BusWithPreLounge,
    BusWithPostLounge,
    BusWithBoth,
    LoungeOnly,
}

impl FromStr for IntentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bus_with_pre_lounge" => Ok(Self::BusWithPreLounge),
            "bus_with_post_lounge" => Ok(Self::BusWithPostLounge),
            "bus_with_both" => Ok(Self::BusWithBoth),
            "lounge_only" => Ok(Self::LoungeOnly),
            "bus_only" | _ => Ok(Self::BusOnly),
        }
    }
}

impl IntentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BusOnly => "bus_only",
            Self::BusWithPreLounge => "bus_with_pre_lounge",
            Self::BusWithPostLounge => "bus_with_post_lounge",
            Self::BusWithBoth => "bus_with_both",
            Self::LoungeOnly => "lounge_only",
        }
    }

    pub fn has_bus_leg(&self) -> bool {
        !matches!(self, Self::LoungeOnly)
    }

    pub fn has_pre_lounge_leg(&self) -> bool {
        matches!(self, Self::BusWithPreLounge | Self::BusWithBoth)
    }

    pub fn has_post_lounge_leg(&self) -> bool {
        matches!(self, Self::BusWithPostLounge | Self::BusWithBoth | Self::LoungeOnly)
    }
}

/// BookingIntent status — see spec state machine (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    #[default]
    Held,
    PaymentPending,
    PaymentConfirmed,
    Confirming,
    Confirmed,
    ConfirmationFailed,
    Expired,
    Cancelled,
}

impl FromStr for IntentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment_pending" => Ok(Self::PaymentPending),
            "payment_confirmed" => Ok(Self::PaymentConfirmed),
            "confirming" => Ok(Self::Confirming),
            "confirmed" => Ok(Self::Confirmed),
            "confirmation_failed" => Ok(Self::ConfirmationFailed),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            "held" | _ => Ok(Self::Held),
        }
    }
}

impl IntentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Held => "held",
            Self::PaymentPending => "payment_pending",
            Self::PaymentConfirmed => "payment_confirmed",
            Self::Confirming => "confirming",
            Self::Confirmed => "confirmed",
            Self::ConfirmationFailed => "confirmation_failed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::Expired | Self::Cancelled | Self::ConfirmationFailed
        )
    }

    pub fn is_live(&self) -> bool {
        !self.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl FromStr for TripStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "scheduled" | _ => Ok(Self::Scheduled),
        }
    }
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Cannot transition out of {in_progress, completed} back to scheduled/confirmed.
    pub fn can_transition_to(&self, target: TripStatus) -> bool {
        match self {
            Self::InProgress | Self::Completed => {
                !matches!(target, Self::Scheduled | Self::Confirmed)
            }
            Self::Cancelled => false,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    #[default]
    Standard,
    Window,
    Aisle,
}

impl FromStr for SeatType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "window" => Ok(Self::Window),
            "aisle" => Ok(Self::Aisle),
            "standard" | _ => Ok(Self::Standard),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    #[default]
    Available,
    Held,
    Booked,
    Blocked,
}

impl FromStr for SeatStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "held" => Ok(Self::Held),
            "booked" => Ok(Self::Booked),
            "blocked" => Ok(Self::Blocked),
            "available" | _ => Ok(Self::Available),
        }
    }
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Held => "held",
            Self::Booked => "booked",
            Self::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    #[default]
    App,
    Phone,
    Agent,
    WalkIn,
    Blocked,
}

impl FromStr for BookingType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phone" => Ok(Self::Phone),
            "agent" => Ok(Self::Agent),
            "walk_in" => Ok(Self::WalkIn),
            "blocked" => Ok(Self::Blocked),
            "app" | _ => Ok(Self::App),
        }
    }
}

/// Lounge reservation pricing tiers (spec §4.1, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum LoungePricingType {
    #[default]
    OneHour,
    TwoHours,
    ThreeHours,
    UntilBus,
}

impl FromStr for LoungePricingType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2_hours" => Ok(Self::TwoHours),
            "3_hours" => Ok(Self::ThreeHours),
            "until_bus" => Ok(Self::UntilBus),
            "1_hour" | _ => Ok(Self::OneHour),
        }
    }
}

impl LoungePricingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1_hour",
            Self::TwoHours => "2_hours",
            Self::ThreeHours => "3_hours",
            Self::UntilBus => "until_bus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum LoungeHoldStatus {
    #[default]
    Held,
    Confirmed,
    Released,
}

impl FromStr for LoungeHoldStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "released" => Ok(Self::Released),
            "held" | _ => Ok(Self::Held),
        }
    }
}

impl LoungeHoldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Held => "held",
            Self::Confirmed => "confirmed",
            Self::Released => "released",
        }
    }
}

/// Which sliding-window dimension a rate limit check covers (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum RateLimitDimension {
    Phone,
    Ip,
}

impl RateLimitDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Ip => "ip",
        }
    }
}

impl FromStr for RateLimitDimension {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ip" => Ok(Self::Ip),
            "phone" | _ => Ok(Self::Phone),
        }
    }
}

/// Gateway deployment target (spec §6 `payment.environment`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export, export_to = "../../../frontend/src/lib/types/")]
#[serde(rename_all = "snake_case")]
pub enum PaymentEnvironment {
    #[default]
    Dev,
    Sandbox,
    Production,
}

impl FromStr for PaymentEnvironment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            "dev" | _ => Ok(Self::Dev),
        }
    }
}
