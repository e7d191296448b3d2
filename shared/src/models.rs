//! Core entities for the cold-storage and marketplace platform

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Lifecycle status of a storage lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LotStatus {
    Received,
    Stored,
    Listed,
    Sold,
    Settled,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Received => "RECEIVED",
            LotStatus::Stored => "STORED",
            LotStatus::Listed => "LISTED",
            LotStatus::Sold => "SOLD",
            LotStatus::Settled => "SETTLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "RECEIVED" => Some(LotStatus::Received),
            "STORED" => Some(LotStatus::Stored),
            "LISTED" => Some(LotStatus::Listed),
            "SOLD" => Some(LotStatus::Sold),
            "SETTLED" => Some(LotStatus::Settled),
            _ => None,
        }
    }

    /// Lots still sitting in a hub; only these are evaluated for sensor alerts.
    pub fn in_storage_pipeline(&self) -> bool {
        matches!(
            self,
            LotStatus::Received | LotStatus::Stored | LotStatus::Listed
        )
    }

    /// Entering SOLD or SETTLED (from any previous status) recomputes the ledger.
    pub fn triggers_settlement(&self) -> bool {
        matches!(self, LotStatus::Sold | LotStatus::Settled)
    }
}

/// Produce quality grade assigned by the hub operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    A,
    B,
    C,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        }
    }
}

/// Fulfilment status of a consumer order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Placed,
    Confirmed,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Dispatched => "DISPATCHED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PLACED" => Some(OrderStatus::Placed),
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "DISPATCHED" => Some(OrderStatus::Dispatched),
            "DELIVERED" => Some(OrderStatus::Delivered),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// Payment state of a consumer order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// A physical cold-storage facility with finite capacity
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Hub {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub capacity_kg: Decimal,
    pub current_used_kg: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Hub {
    /// Admission check: a booking may never push usage past capacity.
    pub fn can_admit(&self, qty_kg: Decimal) -> bool {
        self.current_used_kg + qty_kg <= self.capacity_kg
    }
}

/// A farmer's booked quantity of produce held at a hub
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Lot {
    pub id: Uuid,
    pub lot_id: String,
    pub qr_string: String,
    pub hub_id: Uuid,
    pub farmer_name: String,
    pub phone: String,
    pub village: String,
    pub crop: String,
    pub qty_kg: Decimal,
    pub expected_price: Decimal,
    pub storage_days: i32,
    pub status: LotStatus,
    pub grade: Option<Grade>,
    pub temp: Option<Decimal>,
    pub humidity: Option<Decimal>,
    pub final_weight_kg: Option<Decimal>,
    pub packing_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lot {
    /// Estimated sale value at the booked price.
    pub fn estimated_value(&self) -> Decimal {
        self.qty_kg * self.expected_price
    }
}

/// Lot joined with its hub's display fields, for list/detail responses
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LotWithHub {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub lot: Lot,
    pub hub_name: String,
    pub hub_location: String,
}

/// One line of a settlement deduction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    pub label: String,
    pub amount: Decimal,
}

/// Ledger record: exactly one per lot
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub advance_amount: Decimal,
    pub deductions: Json<Vec<Deduction>>,
    pub final_amount: Decimal,
    pub settled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A consumer order over one or more listed lots
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_id: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Frozen snapshot of one purchased line; never re-read from the lot
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub lot_id: Uuid,
    pub qty_kg: Decimal,
    pub price: Decimal,
}

/// Order with its line items, for API responses
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Append-only event record written by the core
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub kind: String,
    pub message: String,
    pub related_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
