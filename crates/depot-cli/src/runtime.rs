// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use depot_api::Client;
use depot_app::{
    Asn, AsnLine, Brand, Entity, EntityKind, FetchRequest, InventoryRecord, Location, Page,
    PageQuery, Pallet, RowKey, Sku, Warehouse, Zone,
};
use depot_tui::{InternalEvent, ScreenRuntime};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::debug;

/// Screen runtime backed by the REST client. Fetches run on a worker
/// thread so the terminal keeps drawing while a page is in flight.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl<R: Entity> ScreenRuntime<R> for ApiRuntime {
    fn fetch_page(&mut self, query: &PageQuery) -> Result<Page<R>> {
        Ok(self.client.list_page::<R>(query)?)
    }

    fn delete_row(&self, key: &RowKey) -> Result<()> {
        self.client.delete(R::KIND, key)?;
        Ok(())
    }

    fn row_action(&self, key: &RowKey, action: &str) -> Result<()> {
        self.client.action(R::KIND, key, action, None)?;
        Ok(())
    }

    fn spawn_fetch(&mut self, request: FetchRequest, tx: Sender<InternalEvent<R>>) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("fetch-{}", R::KIND.as_str()))
            .spawn(move || {
                let result = client
                    .list_page::<R>(&request.query)
                    .map_err(|error| error.to_string());
                if tx
                    .send(InternalEvent::Fetched {
                        generation: request.generation,
                        result,
                    })
                    .is_err()
                {
                    debug!(generation = request.generation, "screen closed before fetch finished");
                }
            })
            .map_err(|error| anyhow!("spawn fetch worker: {error}"))?;
        Ok(())
    }
}

/// Work that is generic over the row type, run for a kind chosen at runtime.
pub trait EntityTask {
    type Output;

    fn run<R: Entity>(self) -> Self::Output;
}

pub fn for_kind<T: EntityTask>(kind: EntityKind, task: T) -> T::Output {
    match kind {
        EntityKind::Asn => task.run::<Asn>(),
        EntityKind::AsnLine => task.run::<AsnLine>(),
        EntityKind::Pallet => task.run::<Pallet>(),
        EntityKind::Inventory => task.run::<InventoryRecord>(),
        EntityKind::Sku => task.run::<Sku>(),
        EntityKind::Brand => task.run::<Brand>(),
        EntityKind::Warehouse => task.run::<Warehouse>(),
        EntityKind::Zone => task.run::<Zone>(),
        EntityKind::Location => task.run::<Location>(),
    }
}
