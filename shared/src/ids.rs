//! Human-readable identifier generation and resolution
//!
//! Lot and order codes carry a fixed prefix plus an 8-character uppercase
//! alphanumeric suffix taken from a freshly generated UUID. Collisions are
//! statistically negligible and are not re-checked against existing records.

use uuid::Uuid;

pub const LOT_PREFIX: &str = "LOT-";
pub const ORDER_PREFIX: &str = "ORD-";

const SUFFIX_LEN: usize = 8;

fn random_suffix() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .to_ascii_uppercase()
        .chars()
        .take(SUFFIX_LEN)
        .collect()
}

pub fn make_lot_id() -> String {
    format!("{}{}", LOT_PREFIX, random_suffix())
}

pub fn make_order_id() -> String {
    format!("{}{}", ORDER_PREFIX, random_suffix())
}

/// QR payload is derived purely from the lot code.
pub fn make_qr_string(lot_id: &str) -> String {
    format!("farmfresh://trace/{lot_id}")
}

/// How a caller referenced a lot: human-readable code first, internal id second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LotRef {
    Code(String),
    Id(Uuid),
}

impl LotRef {
    /// Single dispatch point for identifier sniffing. `LOT-` prefixed values
    /// resolve by code, anything UUID-shaped by internal id.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.starts_with(LOT_PREFIX) {
            return Some(LotRef::Code(raw.to_string()));
        }
        Uuid::parse_str(raw).ok().map(LotRef::Id)
    }
}

/// Same resolution scheme for orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRef {
    Code(String),
    Id(Uuid),
}

impl OrderRef {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.starts_with(ORDER_PREFIX) {
            return Some(OrderRef::Code(raw.to_string()));
        }
        Uuid::parse_str(raw).ok().map(OrderRef::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lot_id_has_prefix_and_fixed_length() {
        let id = make_lot_id();
        assert!(id.starts_with("LOT-"));
        assert_eq!(id.len(), "LOT-".len() + 8);
        assert!(id["LOT-".len()..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn qr_string_is_deterministic() {
        assert_eq!(
            make_qr_string("LOT-ABCD1234"),
            "farmfresh://trace/LOT-ABCD1234"
        );
        assert_eq!(make_qr_string("LOT-ABCD1234"), make_qr_string("LOT-ABCD1234"));
    }

    #[test]
    fn lot_ref_prefers_code_over_uuid() {
        assert_eq!(
            LotRef::parse("LOT-AB12CD34"),
            Some(LotRef::Code("LOT-AB12CD34".to_string()))
        );

        let uuid = Uuid::new_v4();
        assert_eq!(LotRef::parse(&uuid.to_string()), Some(LotRef::Id(uuid)));

        assert_eq!(LotRef::parse("not-an-id"), None);
    }

    #[test]
    fn order_ref_parses_both_forms() {
        assert_eq!(
            OrderRef::parse("ORD-12345678"),
            Some(OrderRef::Code("ORD-12345678".to_string()))
        );
        let uuid = Uuid::new_v4();
        assert_eq!(OrderRef::parse(&uuid.to_string()), Some(OrderRef::Id(uuid)));
        assert_eq!(OrderRef::parse(""), None);
    }
}
