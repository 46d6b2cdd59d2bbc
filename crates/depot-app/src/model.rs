// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

use crate::ids::*;
use crate::refine::Refiner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Asn,
    AsnLine,
    Pallet,
    Inventory,
    Sku,
    Brand,
    Warehouse,
    Zone,
    Location,
}

impl EntityKind {
    pub const ALL: [Self; 9] = [
        Self::Asn,
        Self::AsnLine,
        Self::Pallet,
        Self::Inventory,
        Self::Sku,
        Self::Brand,
        Self::Warehouse,
        Self::Zone,
        Self::Location,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asn => "asn",
            Self::AsnLine => "asn-line",
            Self::Pallet => "pallet",
            Self::Inventory => "inventory",
            Self::Sku => "sku",
            Self::Brand => "brand",
            Self::Warehouse => "warehouse",
            Self::Zone => "zone",
            Self::Location => "location",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asn" | "asns" => Some(Self::Asn),
            "asn-line" | "asn-lines" => Some(Self::AsnLine),
            "pallet" | "pallets" | "lpn" => Some(Self::Pallet),
            "inventory" => Some(Self::Inventory),
            "sku" | "skus" => Some(Self::Sku),
            "brand" | "brands" => Some(Self::Brand),
            "warehouse" | "warehouses" => Some(Self::Warehouse),
            "zone" | "zones" => Some(Self::Zone),
            "location" | "locations" => Some(Self::Location),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Asn => "ASN",
            Self::AsnLine => "ASN lines",
            Self::Pallet => "pallets",
            Self::Inventory => "inventory",
            Self::Sku => "SKU",
            Self::Brand => "brands",
            Self::Warehouse => "warehouses",
            Self::Zone => "zones",
            Self::Location => "locations",
        }
    }

    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Asn => "/api/asns",
            Self::AsnLine => "/api/asn-lines",
            Self::Pallet => "/api/pallets",
            Self::Inventory => "/api/inventory",
            Self::Sku => "/api/skus",
            Self::Brand => "/api/brands",
            Self::Warehouse => "/api/warehouses",
            Self::Zone => "/api/zones",
            Self::Location => "/api/locations",
        }
    }

    /// Query parameters the backend accepts for this list, `keyword` first.
    pub const fn server_filters(self) -> &'static [&'static str] {
        match self {
            Self::Asn => &["keyword", "asnType", "status", "warehouseCode"],
            Self::AsnLine => &["keyword", "asnId", "skuCode"],
            Self::Pallet => &["keyword", "asnNo", "status", "locationCode"],
            Self::Inventory => &["keyword", "skuCode", "locationCode", "lotNo"],
            Self::Sku => &["keyword", "brandId"],
            Self::Brand => &["keyword"],
            Self::Warehouse => &["keyword", "active"],
            Self::Zone => &["keyword", "warehouseCode", "zoneType"],
            Self::Location => &["keyword", "zoneCode", "locationType"],
        }
    }

    pub fn accepts_server_filter(self, name: &str) -> bool {
        self.server_filters().contains(&name)
    }

    /// Kinds whose rows accept a `confirm` action.
    pub fn has_confirm(self) -> bool {
        matches!(self, Self::Asn)
    }

    /// Server filters that carry a numeric id rather than free text.
    pub fn is_numeric_filter(self, name: &str) -> bool {
        matches!((self, name), (Self::AsnLine, "asnId") | (Self::Sku, "brandId"))
    }
}

/// A row type the list engine can page, key, refine and render.
pub trait Entity: Clone + DeserializeOwned + Send + 'static {
    const KIND: EntityKind;
    const COLUMNS: &'static [&'static str];

    fn row_key(&self) -> RowKey;

    fn cells(&self) -> Vec<String>;

    fn refiner() -> Refiner<Self> {
        Refiner::new()
    }
}

pub fn parse_wire_date(raw: &str) -> Option<Date> {
    let head = raw.trim().get(..10)?;
    Date::parse(head, format_description!("[year]-[month]-[day]")).ok()
}

mod wire_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;
    use time::macros::format_description;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_wire_date))
    }

    pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = value.and_then(|date| {
            date.format(format_description!("[year]-[month]-[day]"))
                .ok()
        });
        match formatted {
            Some(text) => serializer.serialize_some(&text),
            None => serializer.serialize_none(),
        }
    }
}

fn optional_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asn {
    #[serde(default)]
    pub asn_id: Option<AsnId>,
    #[serde(default)]
    pub asn_no: String,
    #[serde(default)]
    pub asn_type: String,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub warehouse_code: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, with = "wire_date")]
    pub expected_arrival: Option<Date>,
}

impl Entity for Asn {
    const KIND: EntityKind = EntityKind::Asn;
    const COLUMNS: &'static [&'static str] = &[
        "asn no", "type", "supplier", "warehouse", "status", "arrival",
    ];

    fn row_key(&self) -> RowKey {
        RowKey::derive(self.asn_id.map(AsnId::get), &self.asn_no)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.asn_no.clone(),
            self.asn_type.clone(),
            self.supplier_name.clone(),
            self.warehouse_code.clone(),
            self.status.clone(),
            optional_cell(self.expected_arrival),
        ]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new()
            .contains("supplier", |row: &Self| row.supplier_name.as_str())
            .equals("status", |row: &Self| row.status.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsnLine {
    #[serde(default)]
    pub asn_id: Option<AsnId>,
    #[serde(default)]
    pub sku_id: Option<SkuId>,
    #[serde(default)]
    pub sku_code: String,
    #[serde(default)]
    pub line_no: Option<i64>,
    #[serde(default)]
    pub expected_qty: i64,
    #[serde(default)]
    pub received_qty: i64,
}

impl Entity for AsnLine {
    const KIND: EntityKind = EntityKind::AsnLine;
    const COLUMNS: &'static [&'static str] = &["line", "sku", "expected", "received"];

    fn row_key(&self) -> RowKey {
        RowKey::composite(
            self.asn_id.map(AsnId::get),
            self.sku_id.map(SkuId::get),
            &self.sku_code,
        )
    }

    fn cells(&self) -> Vec<String> {
        vec![
            optional_cell(self.line_no),
            self.sku_code.clone(),
            self.expected_qty.to_string(),
            self.received_qty.to_string(),
        ]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new().contains("sku", |row: &Self| row.sku_code.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pallet {
    #[serde(default)]
    pub lpn_id: Option<LpnId>,
    #[serde(default)]
    pub lpn_code: String,
    #[serde(default)]
    pub asn_no: String,
    #[serde(default)]
    pub location_code: String,
    #[serde(default)]
    pub status: String,
}

impl Entity for Pallet {
    const KIND: EntityKind = EntityKind::Pallet;
    const COLUMNS: &'static [&'static str] = &["lpn", "asn no", "location", "status"];

    fn row_key(&self) -> RowKey {
        RowKey::derive(self.lpn_id.map(LpnId::get), &self.lpn_code)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.lpn_code.clone(),
            self.asn_no.clone(),
            self.location_code.clone(),
            self.status.clone(),
        ]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new()
            .contains("lpn", |row: &Self| row.lpn_code.as_str())
            .equals("status", |row: &Self| row.status.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[serde(default)]
    pub inventory_id: Option<InventoryId>,
    #[serde(default)]
    pub sku_code: String,
    #[serde(default)]
    pub location_code: String,
    #[serde(default)]
    pub lot_no: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub available_qty: i64,
    #[serde(default, with = "wire_date")]
    pub expiry_date: Option<Date>,
}

impl Entity for InventoryRecord {
    const KIND: EntityKind = EntityKind::Inventory;
    const COLUMNS: &'static [&'static str] =
        &["sku", "location", "lot", "qty", "available", "expiry"];

    fn row_key(&self) -> RowKey {
        match self.inventory_id {
            Some(id) => RowKey::new(id.to_string()),
            None => RowKey::new(format!("{}-{}", self.sku_code, self.location_code)),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.sku_code.clone(),
            self.location_code.clone(),
            self.lot_no.clone(),
            self.quantity.to_string(),
            self.available_qty.to_string(),
            optional_cell(self.expiry_date),
        ]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new()
            .contains("sku", |row: &Self| row.sku_code.as_str())
            .contains("location", |row: &Self| row.location_code.as_str())
            .contains("lot", |row: &Self| row.lot_no.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    #[serde(default, alias = "skuID")]
    pub sku_id: Option<SkuId>,
    #[serde(default)]
    pub sku_code: String,
    #[serde(default)]
    pub sku_name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub unit: String,
}

impl Entity for Sku {
    const KIND: EntityKind = EntityKind::Sku;
    const COLUMNS: &'static [&'static str] = &["code", "name", "brand", "barcode", "unit"];

    fn row_key(&self) -> RowKey {
        RowKey::derive(self.sku_id.map(SkuId::get), &self.sku_code)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.sku_code.clone(),
            self.sku_name.clone(),
            self.brand_name.clone(),
            self.barcode.clone(),
            self.unit.clone(),
        ]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new()
            .contains("name", |row: &Self| row.sku_name.as_str())
            .contains("brand", |row: &Self| row.brand_name.as_str())
            .contains("barcode", |row: &Self| row.barcode.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    #[serde(default)]
    pub brand_code: String,
    #[serde(default)]
    pub brand_name: String,
}

impl Entity for Brand {
    const KIND: EntityKind = EntityKind::Brand;
    const COLUMNS: &'static [&'static str] = &["code", "name"];

    fn row_key(&self) -> RowKey {
        RowKey::derive(self.brand_id.map(BrandId::get), &self.brand_code)
    }

    fn cells(&self) -> Vec<String> {
        vec![self.brand_code.clone(), self.brand_name.clone()]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new().contains("name", |row: &Self| row.brand_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    #[serde(default)]
    pub warehouse_id: Option<WarehouseId>,
    #[serde(default)]
    pub warehouse_code: String,
    #[serde(default)]
    pub warehouse_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub active: bool,
}

impl Entity for Warehouse {
    const KIND: EntityKind = EntityKind::Warehouse;
    const COLUMNS: &'static [&'static str] = &["code", "name", "address", "active"];

    fn row_key(&self) -> RowKey {
        RowKey::derive(self.warehouse_id.map(WarehouseId::get), &self.warehouse_code)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.warehouse_code.clone(),
            self.warehouse_name.clone(),
            self.address.clone(),
            if self.active { "yes" } else { "no" }.to_owned(),
        ]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new().contains("name", |row: &Self| row.warehouse_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    #[serde(default)]
    pub zone_code: String,
    #[serde(default)]
    pub zone_name: String,
    #[serde(default)]
    pub warehouse_code: String,
    #[serde(default)]
    pub zone_type: String,
}

impl Entity for Zone {
    const KIND: EntityKind = EntityKind::Zone;
    const COLUMNS: &'static [&'static str] = &["code", "name", "warehouse", "type"];

    fn row_key(&self) -> RowKey {
        RowKey::derive(self.zone_id.map(ZoneId::get), &self.zone_code)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.zone_code.clone(),
            self.zone_name.clone(),
            self.warehouse_code.clone(),
            self.zone_type.clone(),
        ]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new()
            .contains("name", |row: &Self| row.zone_name.as_str())
            .equals("type", |row: &Self| row.zone_type.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub location_code: String,
    #[serde(default)]
    pub zone_code: String,
    #[serde(default)]
    pub location_type: String,
    #[serde(default)]
    pub capacity: Option<i64>,
}

impl Entity for Location {
    const KIND: EntityKind = EntityKind::Location;
    const COLUMNS: &'static [&'static str] = &["code", "zone", "type", "capacity"];

    fn row_key(&self) -> RowKey {
        RowKey::derive(self.location_id.map(LocationId::get), &self.location_code)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.location_code.clone(),
            self.zone_code.clone(),
            self.location_type.clone(),
            optional_cell(self.capacity),
        ]
    }

    fn refiner() -> Refiner<Self> {
        Refiner::new()
            .contains("code", |row: &Self| row.location_code.as_str())
            .equals("type", |row: &Self| row.location_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Asn, AsnLine, Entity, EntityKind, InventoryRecord, Sku, parse_wire_date};
    use crate::{AsnId, SkuId};
    use time::{Date, Month};

    fn asn(id: Option<i64>) -> Asn {
        Asn {
            asn_id: id.map(AsnId::new),
            asn_no: "ASN-0001".to_owned(),
            asn_type: "PO".to_owned(),
            supplier_name: "Harbor Foods".to_owned(),
            warehouse_code: "WH1".to_owned(),
            status: "open".to_owned(),
            expected_arrival: None,
        }
    }

    #[test]
    fn entity_kind_parse_round_trips() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("LPN"), Some(EntityKind::Pallet));
        assert_eq!(EntityKind::parse("orders"), None);
    }

    #[test]
    fn every_kind_accepts_keyword() {
        for kind in EntityKind::ALL {
            assert!(kind.accepts_server_filter("keyword"), "{kind:?}");
        }
        assert!(!EntityKind::Brand.accepts_server_filter("status"));
        assert!(EntityKind::Sku.is_numeric_filter("brandId"));
        assert!(!EntityKind::Sku.is_numeric_filter("keyword"));
        assert!(EntityKind::Asn.has_confirm());
        assert!(!EntityKind::Pallet.has_confirm());
    }

    #[test]
    fn row_key_ignores_non_key_field_changes() {
        let original = asn(Some(31));
        let mut edited = original.clone();
        edited.asn_no = "ASN-9999".to_owned();
        edited.status = "closed".to_owned();
        edited.supplier_name = "Other".to_owned();
        assert_eq!(original.row_key(), edited.row_key());
        assert_eq!(original.row_key().as_str(), "31");
    }

    #[test]
    fn row_key_falls_back_to_natural_key() {
        assert_eq!(asn(None).row_key().as_str(), "ASN-0001");
    }

    #[test]
    fn asn_line_uses_composite_key() {
        let line = AsnLine {
            asn_id: Some(AsnId::new(4)),
            sku_id: Some(SkuId::new(18)),
            sku_code: "SKU-18".to_owned(),
            line_no: Some(1),
            expected_qty: 10,
            received_qty: 0,
        };
        assert_eq!(line.row_key().as_str(), "4-18");
    }

    #[test]
    fn inventory_without_id_keys_on_sku_and_location() {
        let record: InventoryRecord = serde_json::from_str(
            r#"{"skuCode":"SKU-1","locationCode":"A-01-01","quantity":5}"#,
        )
        .expect("decode inventory");
        assert_eq!(record.row_key().as_str(), "SKU-1-A-01-01");
    }

    #[test]
    fn sku_accepts_upper_case_id_alias() {
        let sku: Sku = serde_json::from_str(r#"{"skuID":77,"skuCode":"SKU-77"}"#)
            .expect("decode sku");
        assert_eq!(sku.sku_id, Some(SkuId::new(77)));
        assert_eq!(sku.row_key().as_str(), "77");
    }

    #[test]
    fn wire_dates_accept_plain_and_timestamp_forms() {
        let expected = Date::from_calendar_date(2026, Month::March, 4).expect("valid date");
        assert_eq!(parse_wire_date("2026-03-04"), Some(expected));
        assert_eq!(parse_wire_date("2026-03-04T08:30:00Z"), Some(expected));
        assert_eq!(parse_wire_date("soon"), None);
        assert_eq!(parse_wire_date(""), None);
    }

    #[test]
    fn asn_decodes_and_renders_arrival_date() {
        let row: Asn = serde_json::from_str(
            r#"{"asnId":2,"asnNo":"ASN-2","expectedArrival":"2026-05-01T00:00:00","extra":true}"#,
        )
        .expect("decode asn");
        assert_eq!(row.cells()[5], "2026-05-01");
        assert_eq!(row.cells().len(), Asn::COLUMNS.len());

        let json = serde_json::to_value(&row).expect("encode asn");
        assert_eq!(json["expectedArrival"], "2026-05-01");
    }
}
