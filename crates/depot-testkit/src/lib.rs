// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use depot_app::{
    Asn, AsnId, AsnLine, Brand, BrandId, Entity, InventoryId, InventoryRecord, ListSource,
    Location, LocationId, LpnId, Page, PageQuery, Pallet, Sku, SkuId, Warehouse, WarehouseId,
    Zone, ZoneId,
};
use serde::Serialize;
use std::collections::VecDeque;
use std::io::Read;
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;
use time::{Date, Duration, Month};
use tiny_http::{Header, Response, Server};

const SUPPLIERS: [&str; 10] = [
    "Northwind Traders",
    "Contoso Foods",
    "Fabrikam Supply",
    "Tailspin Toys",
    "Litware Goods",
    "Adatum Parts",
    "Proseware Textiles",
    "Wingtip Imports",
    "Coho Vineyard",
    "Alpine Ski House",
];

const BRAND_NAMES: [&str; 12] = [
    "Acme", "Globex", "Initech", "Umbrella", "Hooli", "Vandelay", "Stark", "Wayne", "Wonka",
    "Soylent", "Cyberdyne", "Tyrell",
];

const PRODUCTS: [&str; 12] = [
    "Widget",
    "Gasket",
    "Bracket",
    "Cable Tie",
    "Hinge",
    "Fastener",
    "Bearing",
    "Valve",
    "Spring",
    "Washer",
    "Coupler",
    "Sensor",
];

const WAREHOUSE_CITIES: [&str; 8] = [
    "Reno", "Memphis", "Columbus", "Allentown", "Ontario", "Joliet", "Savannah", "Tacoma",
];

const ASN_TYPES: [&str; 3] = ["PO", "RETURN", "TRANSFER"];
const ASN_STATUSES: [&str; 4] = ["NEW", "RECEIVING", "RECEIVED", "CLOSED"];
const PALLET_STATUSES: [&str; 3] = ["OPEN", "PUTAWAY", "SHIPPED"];
const ZONE_TYPES: [&str; 4] = ["AMBIENT", "CHILLED", "FROZEN", "HAZMAT"];
const LOCATION_TYPES: [&str; 3] = ["RACK", "FLOOR", "BULK"];
const UNITS: [&str; 4] = ["EA", "BOX", "CASE", "PLT"];

struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of warehouse rows. Equal seeds yield equal rows; ids
/// count up from 1 per faker.
pub struct WarehouseFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl WarehouseFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn rows<R>(&mut self, count: usize, mut make: impl FnMut(&mut Self) -> R) -> Vec<R> {
        (0..count).map(|_| make(self)).collect()
    }

    pub fn asn(&mut self) -> Asn {
        let id = self.id();
        Asn {
            asn_id: Some(AsnId::new(id)),
            asn_no: format!("ASN{id:06}"),
            asn_type: self.pick(&ASN_TYPES).to_owned(),
            supplier_name: self.pick(&SUPPLIERS).to_owned(),
            warehouse_code: format!("WH{:02}", self.int_n(WAREHOUSE_CITIES.len()) + 1),
            status: self.pick(&ASN_STATUSES).to_owned(),
            expected_arrival: Some(self.date()),
        }
    }

    pub fn asn_line(&mut self, asn_id: AsnId) -> AsnLine {
        let id = self.id();
        let expected_qty = self.int_range(1, 500);
        AsnLine {
            asn_id: Some(asn_id),
            sku_id: Some(SkuId::new(id)),
            sku_code: format!("SKU-{id:05}"),
            line_no: Some(id),
            expected_qty,
            received_qty: self.int_range(0, expected_qty),
        }
    }

    pub fn pallet(&mut self) -> Pallet {
        let id = self.id();
        Pallet {
            lpn_id: Some(LpnId::new(id)),
            lpn_code: format!("LPN{id:08}"),
            asn_no: format!("ASN{:06}", self.int_range(1, 999)),
            location_code: self.location_code(),
            status: self.pick(&PALLET_STATUSES).to_owned(),
        }
    }

    pub fn inventory(&mut self) -> InventoryRecord {
        let id = self.id();
        let quantity = self.int_range(0, 2_000);
        InventoryRecord {
            inventory_id: Some(InventoryId::new(id)),
            sku_code: format!("SKU-{:05}", self.int_range(1, 9_999)),
            location_code: self.location_code(),
            lot_no: format!("LOT{:04}", self.int_range(1, 9_999)),
            quantity,
            available_qty: self.int_range(0, quantity),
            expiry_date: Some(self.date()),
        }
    }

    pub fn sku(&mut self) -> Sku {
        let id = self.id();
        let brand = self.pick(&BRAND_NAMES);
        let product = self.pick(&PRODUCTS);
        Sku {
            sku_id: Some(SkuId::new(id)),
            sku_code: format!("SKU-{id:05}"),
            sku_name: format!("{brand} {product}"),
            brand_name: brand.to_owned(),
            barcode: format!("{:013}", self.rng.next_u64() % 10_000_000_000_000),
            unit: self.pick(&UNITS).to_owned(),
        }
    }

    pub fn brand(&mut self) -> Brand {
        let id = self.id();
        let name = self.pick(&BRAND_NAMES);
        Brand {
            brand_id: Some(BrandId::new(id)),
            brand_code: format!("{}{id}", name.to_uppercase()),
            brand_name: name.to_owned(),
        }
    }

    pub fn warehouse(&mut self) -> Warehouse {
        let id = self.id();
        let city = self.pick(&WAREHOUSE_CITIES);
        Warehouse {
            warehouse_id: Some(WarehouseId::new(id)),
            warehouse_code: format!("WH{id:02}"),
            warehouse_name: format!("{city} DC"),
            address: format!("{} Logistics Pkwy, {city}", self.int_range(100, 9_999)),
            active: self.int_n(5) != 0,
        }
    }

    pub fn zone(&mut self) -> Zone {
        let id = self.id();
        let zone_type = self.pick(&ZONE_TYPES);
        Zone {
            zone_id: Some(ZoneId::new(id)),
            zone_code: format!("Z{id:02}"),
            zone_name: format!("{} {id}", zone_type.to_lowercase()),
            warehouse_code: format!("WH{:02}", self.int_range(1, 8)),
            zone_type: zone_type.to_owned(),
        }
    }

    pub fn location(&mut self) -> Location {
        let id = self.id();
        let location_code = self.location_code();
        Location {
            location_id: Some(LocationId::new(id)),
            zone_code: location_code
                .split('-')
                .next()
                .unwrap_or_default()
                .to_owned(),
            location_code,
            location_type: self.pick(&LOCATION_TYPES).to_owned(),
            capacity: Some(self.int_range(1, 40)),
        }
    }

    fn id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn location_code(&mut self) -> String {
        let aisle = (b'A' + self.int_n(6) as u8) as char;
        format!(
            "{aisle}-{:02}-{:02}",
            self.int_range(1, 30),
            self.int_range(1, 6)
        )
    }

    fn date(&mut self) -> Date {
        let base = Date::from_calendar_date(2026, Month::January, 1).unwrap_or(Date::MIN);
        base.saturating_add(Duration::days(self.int_range(0, 364)))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// In-memory list backend: pages over fixed rows, matches `keyword` against
/// row cells, and records every query it serves.
pub struct ScriptedSource<R> {
    rows: Vec<R>,
    queries: Vec<PageQuery>,
    failures: VecDeque<String>,
    report_total: bool,
}

impl<R: Entity> ScriptedSource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            queries: Vec::new(),
            failures: VecDeque::new(),
            report_total: true,
        }
    }

    /// Pages come back without a total, as some endpoints do.
    pub fn without_total(mut self) -> Self {
        self.report_total = false;
        self
    }

    pub fn fail_next(&mut self, message: &str) {
        self.failures.push_back(message.to_owned());
    }

    pub fn queries(&self) -> &[PageQuery] {
        &self.queries
    }

    pub fn call_count(&self) -> usize {
        self.queries.len()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn remove(&mut self, key: &depot_app::RowKey) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.row_key() != *key);
        self.rows.len() != before
    }
}

impl<R: Entity> ListSource<R> for ScriptedSource<R> {
    fn fetch_page(&mut self, query: &PageQuery) -> Result<Page<R>> {
        self.queries.push(query.clone());
        if let Some(message) = self.failures.pop_front() {
            return Err(anyhow!(message));
        }

        let keyword = query.filter("keyword").map(str::to_lowercase);
        let matching = self
            .rows
            .iter()
            .filter(|row| match &keyword {
                Some(keyword) => row
                    .cells()
                    .iter()
                    .any(|cell| cell.to_lowercase().contains(keyword)),
                None => true,
            })
            .collect::<Vec<_>>();

        let start = query.page.saturating_sub(1) * query.page_size;
        let items = matching
            .iter()
            .skip(start)
            .take(query.page_size)
            .map(|row| (*row).clone())
            .collect();
        let total = self.report_total.then_some(matching.len());
        Ok(Page::new(items, total))
    }
}

/// `{"items": [...], "total": N}` for serving rows from a mock server.
pub fn list_body<R: Serialize>(rows: &[R], total: usize) -> Result<String> {
    let items = serde_json::to_value(rows).context("encode fixture rows")?;
    Ok(serde_json::json!({ "items": items, "total": total }).to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Local HTTP server answering with canned responses in order.
pub struct MockServer {
    base_url: String,
    handle: JoinHandle<Result<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub fn start(responses: Vec<MockResponse>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let base_url = format!("http://{}", server.server_addr());

        let handle = thread::spawn(move || -> Result<Vec<RecordedRequest>> {
            let mut recorded = Vec::new();
            for canned in responses {
                let Some(mut request) = server
                    .recv_timeout(StdDuration::from_secs(5))
                    .context("receive mock request")?
                else {
                    break;
                };

                let mut body = String::new();
                request
                    .as_reader()
                    .read_to_string(&mut body)
                    .context("read mock request body")?;
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_owned());
                recorded.push(RecordedRequest {
                    method: request.method().as_str().to_owned(),
                    url: request.url().to_owned(),
                    authorization,
                    body,
                });

                let content_type = Header::from_bytes("Content-Type", "application/json")
                    .map_err(|()| anyhow!("invalid content type header"))?;
                let response = Response::from_string(canned.body)
                    .with_status_code(canned.status)
                    .with_header(content_type);
                request.respond(response).context("send mock response")?;
            }
            Ok(recorded)
        });

        Ok(Self { base_url, handle })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for the canned responses to be served and returns what was asked.
    pub fn finish(self) -> Result<Vec<RecordedRequest>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock server thread panicked"))?
    }
}
