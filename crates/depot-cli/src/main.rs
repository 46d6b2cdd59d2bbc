// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use depot_api::Client;
use depot_app::{
    AdjustDirection, Authenticator, Completion, Entity, EntityKind, FilterValue, FormPayload,
    InventoryAdjustmentInput, InventoryId, ListQuery, PageWindowMode, PendingAction, RowKey,
    StaticTokenAuth, parse_page_size, parse_row_id, require_authenticated, run_batch,
};
use runtime::{ApiRuntime, EntityTask, for_kind};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("DEPOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `depot --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let client = Client::new(config.base_url(), config.timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    let Some(command) = options.command else {
        print_help();
        return Ok(());
    };

    let mut auth = StaticTokenAuth::new(
        config.token().map(str::to_owned),
        config.auth.issuer.clone(),
        config.auth.client_id.clone(),
    );
    require_authenticated(&mut auth)?;
    let client = client.with_token(auth.bearer_token());

    match command {
        Command::List(args) => {
            let kind = args.kind;
            let output = for_kind(
                kind,
                ListTask {
                    client,
                    args,
                    default_page_size: config.page_size(),
                    window: config.page_window(),
                },
            )?;
            print!("{output}");
            Ok(())
        }
        Command::Run { action, yes } => run_action(&client, &action, yes),
        Command::Browse { kind } => for_kind(
            kind,
            BrowseTask {
                client,
                page_size: config.page_size(),
                window: config.page_window(),
            },
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListArgs {
    kind: EntityKind,
    keyword: Option<String>,
    filters: Vec<(String, String)>,
    client_filters: Vec<(String, String)>,
    page: usize,
    page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List(ListArgs),
    /// Delete, confirm or adjust; refused unless `yes` is set.
    Run {
        action: PendingAction,
        yes: bool,
    },
    Browse {
        kind: EntityKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    command: Option<Command>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        command: None,
    };

    let args = args
        .into_iter()
        .map(|arg| arg.as_ref().to_owned())
        .collect::<Vec<_>>();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            "list" | "delete" | "confirm" | "browse" => {
                let rest = iter.by_ref().collect::<Vec<_>>();
                options.command = Some(parse_command(&arg, rest)?);
            }
            "adjust" => {
                let rest = iter.by_ref().collect::<Vec<_>>();
                options.command = Some(parse_adjust(rest)?);
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn parse_command(name: &str, args: Vec<String>) -> Result<Command> {
    let mut iter = args.into_iter();
    let raw_kind = iter
        .next()
        .ok_or_else(|| anyhow!("{name} requires an entity; one of: {}", kind_names()))?;
    let kind = parse_kind(&raw_kind)?;

    match name {
        "list" => {
            let mut list = ListArgs {
                kind,
                keyword: None,
                filters: Vec::new(),
                client_filters: Vec::new(),
                page: 1,
                page_size: None,
            };
            while let Some(arg) = iter.next() {
                let mut value = |flag: &str| {
                    iter.next()
                        .ok_or_else(|| anyhow!("{flag} requires a value"))
                };
                match arg.as_str() {
                    "--keyword" => list.keyword = Some(value("--keyword")?),
                    "--filter" => list
                        .filters
                        .push(parse_pair("--filter", &value("--filter")?)?),
                    "--where" => list
                        .client_filters
                        .push(parse_pair("--where", &value("--where")?)?),
                    "--page" => {
                        let raw = value("--page")?;
                        list.page = raw
                            .parse::<usize>()
                            .ok()
                            .filter(|page| *page > 0)
                            .ok_or_else(|| {
                                anyhow!("--page must be a positive number, got {raw:?}")
                            })?;
                    }
                    "--page-size" => {
                        list.page_size = Some(parse_page_size(&value("--page-size")?)?);
                    }
                    unknown => bail!("unknown list option {unknown:?}; run with --help"),
                }
            }
            Ok(Command::List(list))
        }
        "delete" | "confirm" => {
            if name == "confirm" && !kind.has_confirm() {
                bail!("{} have no confirm step", kind.label());
            }
            let mut keys = Vec::new();
            let mut yes = false;
            for arg in iter {
                match arg.as_str() {
                    "--yes" | "-y" => yes = true,
                    flag if flag.starts_with("--") => {
                        bail!("unknown {name} option {flag:?}; run with --help")
                    }
                    key => keys.push(RowKey::from(key)),
                }
            }
            if keys.is_empty() {
                bail!("{name} {} requires at least one row key", kind.as_str());
            }
            let action = if name == "confirm" {
                PendingAction::Confirm { kind, keys }
            } else {
                PendingAction::Delete { kind, keys }
            };
            Ok(Command::Run { action, yes })
        }
        _ => {
            if let Some(extra) = iter.next() {
                bail!("unexpected argument {extra:?} after browse {}", kind.as_str());
            }
            Ok(Command::Browse { kind })
        }
    }
}

fn parse_adjust(args: Vec<String>) -> Result<Command> {
    let mut iter = args.into_iter();
    let raw_id = iter
        .next()
        .ok_or_else(|| anyhow!("adjust requires an inventory id"))?;
    let inventory_id = InventoryId::new(parse_row_id(&raw_id)?);

    let mut change = None;
    let mut reason = String::new();
    let mut yes = false;
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .ok_or_else(|| anyhow!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--increase" => {
                let quantity = parse_quantity(&value("--increase")?)?;
                change = Some((AdjustDirection::Increase, quantity));
            }
            "--decrease" => {
                let quantity = parse_quantity(&value("--decrease")?)?;
                change = Some((AdjustDirection::Decrease, quantity));
            }
            "--reason" => reason = value("--reason")?,
            "--yes" | "-y" => yes = true,
            unknown => bail!("unknown adjust option {unknown:?}; run with --help"),
        }
    }

    let (direction, quantity) =
        change.ok_or_else(|| anyhow!("adjust needs --increase N or --decrease N"))?;
    let input = InventoryAdjustmentInput {
        inventory_id,
        direction,
        quantity,
        reason,
    };
    input.validate()?;
    Ok(Command::Run {
        action: PendingAction::Adjust(input),
        yes,
    })
}

fn parse_quantity(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| anyhow!("quantity must be a whole number, got {raw:?}"))
}

fn parse_kind(raw: &str) -> Result<EntityKind> {
    EntityKind::parse(raw)
        .ok_or_else(|| anyhow!("unknown entity {raw:?}; use one of: {}", kind_names()))
}

fn kind_names() -> String {
    EntityKind::ALL
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_pair(flag: &str, raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.trim().to_owned()))
        }
        _ => bail!("{flag} expects name=value, got {raw:?}"),
    }
}

struct ListTask {
    client: Client,
    args: ListArgs,
    default_page_size: usize,
    window: PageWindowMode,
}

impl EntityTask for ListTask {
    type Output = Result<String>;

    fn run<R: Entity>(mut self) -> Result<String> {
        let page_size = self.args.page_size.unwrap_or(self.default_page_size);
        let mut list = ListQuery::<R>::with_page_size(page_size);
        if let Some(keyword) = &self.args.keyword {
            list.set_server_filter("keyword", FilterValue::parse(keyword))?;
        }
        for (name, value) in &self.args.filters {
            list.set_server_filter(name, FilterValue::parse(value))?;
        }
        for (name, value) in &self.args.client_filters {
            list.set_client_filter(name, FilterValue::parse(value))?;
        }

        if let Completion::Failed(message) = list.refresh(&mut self.client) {
            bail!("list {}: {message}", R::KIND.label());
        }
        if self.args.page > 1 {
            let request = list.go_to_page(self.args.page).ok_or_else(|| {
                anyhow!(
                    "page {} is out of range; {} has {} page(s)",
                    self.args.page,
                    R::KIND.label(),
                    list.total_pages()
                )
            })?;
            if let Completion::Failed(message) = list.load(&mut self.client, request) {
                bail!("list {}: {message}", R::KIND.label());
            }
        }

        Ok(render_list(&list, self.window))
    }
}

fn render_list<R: Entity>(list: &ListQuery<R>, window: PageWindowMode) -> String {
    let rows = list.visible_rows().map(Entity::cells).collect::<Vec<_>>();
    let mut out = if rows.is_empty() {
        format!("no {} found\n", R::KIND.label())
    } else {
        format_table(R::COLUMNS, &rows)
    };
    out.push_str(&format!(
        "pages: {} | {}\n",
        depot_tui::page_window_text(list, window),
        depot_tui::range_text(list)
    ));
    out
}

fn format_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = columns
        .iter()
        .map(|column| column.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut out = String::new();
    out.push_str(&line(columns.to_vec()));
    out.push('\n');
    let rules = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>();
    out.push_str(&line(rules.iter().map(String::as_str).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

fn run_action(client: &Client, action: &PendingAction, yes: bool) -> Result<()> {
    let verb = action.verb();
    let kind = action.kind();
    let keys = action.keys();
    if !yes {
        bail!(
            "refusing to {verb} {} {} without --yes",
            keys.len(),
            kind.label()
        );
    }

    let summary = run_batch(
        verb,
        &keys,
        |key| {
            match action {
                PendingAction::Delete { .. } => {
                    client.delete(kind, key)?;
                }
                PendingAction::Confirm { .. } => {
                    client.action(kind, key, "confirm", None)?;
                }
                PendingAction::Adjust(input) => {
                    client.submit(&FormPayload::Adjustment(input.clone()), None)?;
                }
            }
            Ok(())
        },
        |notice| {
            if notice.is_error() {
                eprintln!("{}", notice.message);
            } else {
                println!("{}", notice.message);
            }
        },
    );
    info!(
        kind = kind.as_str(),
        action = verb,
        succeeded = summary.succeeded.len(),
        "batch finished"
    );

    if !summary.is_clean() {
        bail!(
            "{} of {} {verb} requests failed",
            summary.failed.len(),
            summary.total
        );
    }
    Ok(())
}

struct BrowseTask {
    client: Client,
    page_size: usize,
    window: PageWindowMode,
}

impl EntityTask for BrowseTask {
    type Output = Result<()>;

    fn run<R: Entity>(self) -> Result<()> {
        let mut runtime = ApiRuntime::new(self.client);
        let mut screen = depot_tui::Screen::<R>::new(self.page_size, self.window);
        depot_tui::run_screen(&mut runtime, &mut screen)
    }
}

fn print_help() {
    println!("depot -- warehouse lists from the terminal");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and exit");
    println!("  --help                   Show this help");
    println!();
    println!("  list <entity> [--keyword K] [--filter name=value]... [--where name=value]...");
    println!("                [--page N] [--page-size N]");
    println!("  delete <entity> <key>... --yes");
    println!("  confirm asn <key>... --yes");
    println!("  adjust <inventory-id> (--increase N | --decrease N) --reason TEXT --yes");
    println!("  browse <entity>");
    println!();
    println!("  entities: {}", kind_names());
    println!("  logging: set DEPOT_LOG (for example DEPOT_LOG=debug); output goes to stderr");
}

#[cfg(test)]
mod tests {
    use super::{
        CliOptions, Command, ListArgs, ListTask, format_table, parse_cli_args, run_action,
    };
    use crate::runtime::for_kind;
    use anyhow::Result;
    use depot_api::Client;
    use depot_app::{
        AdjustDirection, EntityKind, InventoryAdjustmentInput, InventoryId, PageWindowMode,
        PendingAction, RowKey,
    };
    use depot_testkit::{MockResponse, MockServer, WarehouseFaker, list_body};
    use std::path::PathBuf;
    use std::time::Duration;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/depot-config.toml")
    }

    fn list_args(kind: EntityKind) -> ListArgs {
        ListArgs {
            kind,
            keyword: None,
            filters: Vec::new(),
            client_filters: Vec::new(),
            page: 1,
            page_size: None,
        }
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
                command: None,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn list_command_collects_filters_and_paging() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--config",
                "/custom/config.toml",
                "list",
                "pallets",
                "--keyword",
                "LPN",
                "--filter",
                "status=OPEN",
                "--where",
                "lpn=0007",
                "--page",
                "2",
                "--page-size",
                "50",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(
            options.command,
            Some(Command::List(ListArgs {
                kind: EntityKind::Pallet,
                keyword: Some("LPN".to_owned()),
                filters: vec![("status".to_owned(), "OPEN".to_owned())],
                client_filters: vec![("lpn".to_owned(), "0007".to_owned())],
                page: 2,
                page_size: Some(50),
            }))
        );
        Ok(())
    }

    #[test]
    fn list_command_rejects_bad_values() {
        for args in [
            vec!["list"],
            vec!["list", "widgets"],
            vec!["list", "brand", "--filter", "novalue"],
            vec!["list", "brand", "--page", "0"],
            vec!["list", "brand", "--page-size", "ten"],
            vec!["list", "brand", "--keyword"],
        ] {
            assert!(
                parse_cli_args(args.clone(), default_options_path()).is_err(),
                "expected {args:?} to fail"
            );
        }
    }

    #[test]
    fn delete_and_browse_commands() -> Result<()> {
        let options = parse_cli_args(vec!["delete", "sku", "4", "9", "--yes"], default_options_path())?;
        assert_eq!(
            options.command,
            Some(Command::Run {
                action: PendingAction::Delete {
                    kind: EntityKind::Sku,
                    keys: vec![RowKey::from("4"), RowKey::from("9")],
                },
                yes: true,
            })
        );

        let error = parse_cli_args(vec!["delete", "sku", "--yes"], default_options_path())
            .expect_err("no keys should fail");
        assert!(error.to_string().contains("at least one row key"));

        let options = parse_cli_args(vec!["browse", "zones"], default_options_path())?;
        assert_eq!(
            options.command,
            Some(Command::Browse {
                kind: EntityKind::Zone
            })
        );
        Ok(())
    }

    #[test]
    fn confirm_command_only_for_asns() -> Result<()> {
        let options = parse_cli_args(vec!["confirm", "asn", "ASN-7"], default_options_path())?;
        assert_eq!(
            options.command,
            Some(Command::Run {
                action: PendingAction::Confirm {
                    kind: EntityKind::Asn,
                    keys: vec![RowKey::from("ASN-7")],
                },
                yes: false,
            })
        );

        let error = parse_cli_args(vec!["confirm", "pallets", "3"], default_options_path())
            .expect_err("pallets have no confirm");
        assert!(error.to_string().contains("no confirm step"));
        Ok(())
    }

    #[test]
    fn adjust_command_builds_validated_input() -> Result<()> {
        let options = parse_cli_args(
            vec!["adjust", " 31 ", "--decrease", "4", "--reason", "damaged", "-y"],
            default_options_path(),
        )?;
        assert_eq!(
            options.command,
            Some(Command::Run {
                action: PendingAction::Adjust(InventoryAdjustmentInput {
                    inventory_id: InventoryId::new(31),
                    direction: AdjustDirection::Decrease,
                    quantity: 4,
                    reason: "damaged".to_owned(),
                }),
                yes: true,
            })
        );

        for (args, expected) in [
            (vec!["adjust"], "requires an inventory id"),
            (vec!["adjust", "abc", "--increase", "1"], "is not a row id"),
            (vec!["adjust", "0", "--increase", "1"], "row id must be positive"),
            (vec!["adjust", "31", "--reason", "x"], "--increase N or --decrease N"),
            (vec!["adjust", "31", "--increase", "two"], "whole number"),
            (vec!["adjust", "31", "--increase", "0", "--reason", "x"], "must be positive"),
            (vec!["adjust", "31", "--increase", "2"], "adjustment reason is required"),
        ] {
            let error = parse_cli_args(args.clone(), default_options_path())
                .expect_err("invalid adjust should fail");
            assert!(
                error.to_string().contains(expected),
                "{args:?}: {error}"
            );
        }
        Ok(())
    }

    #[test]
    fn format_table_pads_columns() {
        let table = format_table(
            &["code", "name"],
            &[
                vec!["ACME1".to_owned(), "Acme".to_owned()],
                vec!["W2".to_owned(), "Wonka".to_owned()],
            ],
        );
        assert_eq!(
            table,
            "code   name\n-----  -----\nACME1  Acme\nW2     Wonka\n"
        );
    }

    #[test]
    fn list_task_fetches_requested_page() -> Result<()> {
        let mut faker = WarehouseFaker::new(3);
        let brands = faker.rows(25, WarehouseFaker::brand);
        let server = MockServer::start(vec![
            MockResponse::ok(list_body(&brands[..10], 25)?),
            MockResponse::ok(list_body(&brands[10..20], 25)?),
        ])?;
        let client = Client::new(server.base_url(), Duration::from_secs(2))?;
        let mut args = list_args(EntityKind::Brand);
        args.page = 2;
        args.keyword = Some("a".to_owned());

        let output = for_kind(
            EntityKind::Brand,
            ListTask {
                client,
                args,
                default_page_size: 10,
                window: PageWindowMode::All,
            },
        )?;
        assert!(output.starts_with("code"));
        assert!(output.contains(&brands[10].brand_code));
        assert!(output.ends_with("pages: 1 [2] 3 | rows 11-20 of 25\n"));

        let requests = server.finish()?;
        assert_eq!(requests[1].url, "/api/brands?keyword=a&page=2&pageSize=10");
        Ok(())
    }

    #[test]
    fn list_task_reports_out_of_range_page() -> Result<()> {
        let server = MockServer::start(vec![MockResponse::ok(r#"{"items":[],"total":0}"#)])?;
        let client = Client::new(server.base_url(), Duration::from_secs(2))?;
        let mut args = list_args(EntityKind::Zone);
        args.page = 4;

        let error = for_kind(
            EntityKind::Zone,
            ListTask {
                client,
                args,
                default_page_size: 20,
                window: PageWindowMode::All,
            },
        )
        .expect_err("page 4 of nothing");
        assert!(error.to_string().contains("out of range"));
        server.finish()?;
        Ok(())
    }

    #[test]
    fn delete_without_yes_touches_nothing() -> Result<()> {
        let server = MockServer::start(Vec::new())?;
        let client = Client::new(server.base_url(), Duration::from_secs(2))?;
        let action = PendingAction::Delete {
            kind: EntityKind::Pallet,
            keys: vec![RowKey::from("1")],
        };
        let error = run_action(&client, &action, false).expect_err("needs --yes");
        assert!(error.to_string().contains("without --yes"));
        assert!(server.finish()?.is_empty());
        Ok(())
    }

    #[test]
    fn delete_reports_partial_failure() -> Result<()> {
        let server = MockServer::start(vec![
            MockResponse::ok(""),
            MockResponse::new(409, r#"{"message":"pallet is allocated"}"#),
        ])?;
        let client = Client::new(server.base_url(), Duration::from_secs(2))?;
        let action = PendingAction::Delete {
            kind: EntityKind::Pallet,
            keys: vec![RowKey::from("1"), RowKey::from("2")],
        };
        let error = run_action(&client, &action, true).expect_err("one delete fails");
        assert_eq!(error.to_string(), "1 of 2 delete requests failed");
        assert_eq!(server.finish()?.len(), 2);
        Ok(())
    }

    #[test]
    fn confirm_and_adjust_post_to_row_actions() -> Result<()> {
        let server = MockServer::start(vec![
            MockResponse::ok(r#"{"isSuccess":true}"#),
            MockResponse::ok(r#"{"isSuccess":true,"data":{"quantity":36}}"#),
        ])?;
        let client = Client::new(server.base_url(), Duration::from_secs(2))?;

        run_action(
            &client,
            &PendingAction::Confirm {
                kind: EntityKind::Asn,
                keys: vec![RowKey::from("ASN-7")],
            },
            true,
        )?;
        run_action(
            &client,
            &PendingAction::Adjust(InventoryAdjustmentInput {
                inventory_id: InventoryId::new(31),
                direction: AdjustDirection::Increase,
                quantity: 6,
                reason: "cycle count".to_owned(),
            }),
            true,
        )?;

        let requests = server.finish()?;
        let calls = requests
            .iter()
            .map(|request| format!("{} {}", request.method, request.url))
            .collect::<Vec<_>>();
        assert_eq!(
            calls,
            vec!["POST /api/asns/ASN-7/confirm", "POST /api/inventory/31/adjust"]
        );
        assert!(requests[1].body.contains("\"direction\":\"increase\""));
        Ok(())
    }
}
