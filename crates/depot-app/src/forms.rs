// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::{EntityKind, InventoryId, RowKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Brand,
    Sku,
    Warehouse,
    Zone,
    Location,
    InventoryAdjustment,
}

impl FormKind {
    pub const fn entity(self) -> EntityKind {
        match self {
            Self::Brand => EntityKind::Brand,
            Self::Sku => EntityKind::Sku,
            Self::Warehouse => EntityKind::Warehouse,
            Self::Zone => EntityKind::Zone,
            Self::Location => EntityKind::Location,
            Self::InventoryAdjustment => EntityKind::Inventory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFormInput {
    pub brand_code: String,
    pub brand_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuFormInput {
    pub sku_code: String,
    pub sku_name: String,
    pub brand_id: Option<i64>,
    pub barcode: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseFormInput {
    pub warehouse_code: String,
    pub warehouse_name: String,
    pub address: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneFormInput {
    pub zone_code: String,
    pub zone_name: String,
    pub warehouse_code: String,
    pub zone_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFormInput {
    pub location_code: String,
    pub zone_code: String,
    pub location_type: String,
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustDirection {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAdjustmentInput {
    #[serde(skip)]
    pub inventory_id: InventoryId,
    pub direction: AdjustDirection,
    pub quantity: i64,
    pub reason: String,
}

impl InventoryAdjustmentInput {
    pub fn key(&self) -> RowKey {
        RowKey::new(self.inventory_id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    Brand(BrandFormInput),
    Sku(SkuFormInput),
    Warehouse(WarehouseFormInput),
    Zone(ZoneFormInput),
    Location(LocationFormInput),
    Adjustment(InventoryAdjustmentInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Brand(_) => FormKind::Brand,
            Self::Sku(_) => FormKind::Sku,
            Self::Warehouse(_) => FormKind::Warehouse,
            Self::Zone(_) => FormKind::Zone,
            Self::Location(_) => FormKind::Location,
            Self::Adjustment(_) => FormKind::InventoryAdjustment,
        }
    }

    pub fn blank_for(kind: FormKind) -> Self {
        match kind {
            FormKind::Brand => Self::Brand(BrandFormInput {
                brand_code: String::new(),
                brand_name: String::new(),
            }),
            FormKind::Sku => Self::Sku(SkuFormInput {
                sku_code: String::new(),
                sku_name: String::new(),
                brand_id: None,
                barcode: String::new(),
                unit: String::new(),
            }),
            FormKind::Warehouse => Self::Warehouse(WarehouseFormInput {
                warehouse_code: String::new(),
                warehouse_name: String::new(),
                address: String::new(),
                active: true,
            }),
            FormKind::Zone => Self::Zone(ZoneFormInput {
                zone_code: String::new(),
                zone_name: String::new(),
                warehouse_code: String::new(),
                zone_type: String::new(),
            }),
            FormKind::Location => Self::Location(LocationFormInput {
                location_code: String::new(),
                zone_code: String::new(),
                location_type: String::new(),
                capacity: None,
            }),
            FormKind::InventoryAdjustment => Self::Adjustment(InventoryAdjustmentInput {
                inventory_id: InventoryId::new(0),
                direction: AdjustDirection::Increase,
                quantity: 0,
                reason: String::new(),
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Brand(brand) => brand.validate(),
            Self::Sku(sku) => sku.validate(),
            Self::Warehouse(warehouse) => warehouse.validate(),
            Self::Zone(zone) => zone.validate(),
            Self::Location(location) => location.validate(),
            Self::Adjustment(adjustment) => adjustment.validate(),
        }
    }

    /// Validates, then renders the camelCase request body.
    pub fn to_body(&self) -> Result<serde_json::Value> {
        self.validate()?;
        let body = match self {
            Self::Brand(brand) => serde_json::to_value(brand),
            Self::Sku(sku) => serde_json::to_value(sku),
            Self::Warehouse(warehouse) => serde_json::to_value(warehouse),
            Self::Zone(zone) => serde_json::to_value(zone),
            Self::Location(location) => serde_json::to_value(location),
            Self::Adjustment(adjustment) => serde_json::to_value(adjustment),
        };
        body.context("encode form body")
    }
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{what} is required -- enter a value and retry");
    }
    Ok(())
}

impl BrandFormInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.brand_code, "brand code")?;
        require(&self.brand_name, "brand name")
    }
}

impl SkuFormInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.sku_code, "SKU code")?;
        require(&self.sku_name, "SKU name")?;
        if let Some(brand_id) = self.brand_id
            && brand_id <= 0
        {
            bail!("SKU brand id must be positive -- choose a brand and retry");
        }
        Ok(())
    }
}

impl WarehouseFormInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.warehouse_code, "warehouse code")?;
        require(&self.warehouse_name, "warehouse name")
    }
}

impl ZoneFormInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.zone_code, "zone code")?;
        require(&self.warehouse_code, "zone warehouse")
    }
}

impl LocationFormInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.location_code, "location code")?;
        require(&self.zone_code, "location zone")?;
        if let Some(capacity) = self.capacity
            && capacity <= 0
        {
            bail!("location capacity must be positive");
        }
        Ok(())
    }
}

impl InventoryAdjustmentInput {
    pub fn validate(&self) -> Result<()> {
        if self.inventory_id.get() <= 0 {
            bail!("adjustment needs an inventory record -- select a row and retry");
        }
        if self.quantity <= 0 {
            bail!(
                "adjustment quantity must be positive, got {} -- pick increase or decrease for the sign",
                self.quantity
            );
        }
        require(&self.reason, "adjustment reason")
    }
}

/// Parses a user-typed numeric row id.
pub fn parse_row_id(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    let id: i64 = trimmed
        .parse()
        .with_context(|| format!("{trimmed:?} is not a row id -- ids are positive whole numbers"))?;
    if id <= 0 {
        bail!("row id must be positive, got {id}");
    }
    Ok(id)
}
