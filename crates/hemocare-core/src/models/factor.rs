//! Factor inventory models.

use serde::{Deserialize, Serialize};

/// A lot of clotting factor concentrate in the center's inventory,
/// supplied by the caller as a read-only snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Factor {
    /// Backend record id
    pub id: i64,
    /// Product name
    pub name: String,
    /// Manufacturer lot number
    pub lot_no: String,
    /// On-hand quantity in dispensing units
    pub quantity: i64,
    /// Expiry date
    pub expiry_date: String,
    /// Dosage strength in mg
    pub mg: i64,
    /// Drug classification (e.g. "Factor VIII")
    pub drug_type: String,
    /// Supplier name
    pub supplier_name: String,
    /// Manufacturer name
    pub company_name: String,
}

impl Factor {
    /// Whether any stock remains to dispense from.
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Full-attribute update payload carrying every field unchanged.
    pub fn update_payload(&self) -> FactorUpdate {
        FactorUpdate {
            name: self.name.clone(),
            lot_no: self.lot_no.clone(),
            quantity: self.quantity,
            expiry_date: self.expiry_date.clone(),
            mg: self.mg,
            drug_type: self.drug_type.clone(),
            supplier_name: self.supplier_name.clone(),
            company_name: self.company_name.clone(),
        }
    }
}

/// Update payload for a factor. The backend replaces the whole record, so
/// every attribute must be carried even when only the quantity changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct FactorUpdate {
    pub name: String,
    pub lot_no: String,
    pub quantity: i64,
    pub expiry_date: String,
    pub mg: i64,
    pub drug_type: String,
    pub supplier_name: String,
    pub company_name: String,
}

impl FactorUpdate {
    /// Decrement the on-hand quantity by `units`, clamping at zero.
    ///
    /// The quantity is computed from the caller's snapshot, not a fresh
    /// fetch; concurrent sessions dispensing the same lot need server-side
    /// coordination for strict stock accuracy.
    pub fn with_decremented_quantity(mut self, units: i64) -> Self {
        self.quantity = (self.quantity - units).max(0);
        self
    }
}
