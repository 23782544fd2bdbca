//! Development harness for the InfraKitchen plugin core.
//!
//! Talks to a running InfraKitchen proxy through the same adapter the host
//! uses, and renders the navigation shell and theme overrides offline.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand};
use infrakitchen::config::DevSettings;
use infrakitchen::domain::ports::{InfraKitchenApi, ListQuery, TreeDirection};
use infrakitchen::domain::{
    MountPath, NavigationShell, Palette, PermissionMap, ShellState, ThemeMode, override_css,
};
use infrakitchen::plugin::{InfraKitchenPlugin, ROOT_MOUNT_PATH};
use ortho_config::OrthoConfig;
use pagination::{Pagination, Sort, SortOrder};
use serde_json::{Map, Value};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `infrakitchen-dev` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "infrakitchen-dev",
    about = "Exercise the InfraKitchen plugin core against a running backend",
    version
)]
struct CliArgs {
    /// Host backend base URL. Falls back to `INFRAKITCHEN_BACKEND_BASE_URL`.
    #[arg(long = "base-url", value_name = "url", global = true)]
    base_url: Option<String>,
    /// Bearer token. Falls back to `INFRAKITCHEN_TOKEN`.
    #[arg(long, value_name = "token", global = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Fetch one page of a resource collection.
    List {
        /// Collection name, e.g. `templates`.
        resource: String,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long = "per-page", default_value_t = 10)]
        per_page: u64,
        #[arg(long = "sort-field", default_value = "id")]
        sort_field: String,
        #[arg(long = "sort-order", default_value = "ASC")]
        sort_order: SortOrder,
        /// Filter criteria as a JSON object.
        #[arg(long, value_parser = parse_json_object)]
        filter: Option<Map<String, Value>>,
    },
    /// GET an arbitrary path below the API root.
    Get {
        path: String,
        /// Query parameters as a JSON object.
        #[arg(long, value_parser = parse_json_object)]
        params: Option<Map<String, Value>>,
    },
    /// Fetch the dependency tree of one entity.
    Tree {
        component: String,
        id: String,
        #[arg(long, default_value = "children")]
        direction: TreeDirection,
    },
    /// Fetch the variable schema of a source code version.
    Variables {
        id: String,
        /// Parent resource name; repeat for several.
        #[arg(long = "parent")]
        parents: Vec<String>,
    },
    /// Download the debug bundle of a resource.
    Download {
        id: String,
        #[arg(long, value_name = "path")]
        output: PathBuf,
    },
    /// Render the navigation shell for a location and permission map.
    Shell {
        /// Current location path.
        #[arg(long, default_value = ROOT_MOUNT_PATH)]
        path: String,
        /// Resolved permissions as a JSON object; omit to render the loading state.
        #[arg(long, value_parser = parse_permissions)]
        permissions: Option<PermissionMap>,
        /// Explicit mount path; the base path is inferred from `--path` when omitted.
        #[arg(long)]
        mount: Option<String>,
    },
    /// Print the theme override stylesheet.
    Css {
        /// Host palette mode.
        #[arg(long)]
        mode: Option<String>,
        /// Palette colours as a JSON object.
        #[arg(long, value_parser = parse_palette)]
        palette: Option<Palette>,
    },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let mut settings = DevSettings::load_from_iter([OsString::from("infrakitchen-dev")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    if args.base_url.is_some() {
        settings.backend_base_url = args.base_url;
    }
    if args.token.is_some() {
        settings.token = args.token;
    }

    match args.command {
        Command::Shell {
            path,
            permissions,
            mount,
        } => render_shell(&path, permissions, mount.as_deref()),
        Command::Css { mode, palette } => {
            let css = override_css(
                ThemeMode::resolve(mode.as_deref()),
                &palette.unwrap_or_default(),
            );
            print!("{css}");
            Ok(())
        }
        command => run_remote(&settings, command).await,
    }
}

async fn run_remote(settings: &DevSettings, command: Command) -> io::Result<()> {
    let api = InfraKitchenPlugin::create_api(
        Arc::new(settings.identity()),
        &settings.host_config(),
        settings.client_options(),
    )
    .map_err(|error| io::Error::other(format!("create API client: {error}")))?;
    info!(base_url = settings.backend_base_url(), "connected dev harness");

    let output = match command {
        Command::List {
            resource,
            page,
            per_page,
            sort_field,
            sort_order,
            filter,
        } => {
            let pagination = Pagination::new(page, per_page).map_err(|error| {
                io::Error::new(io::ErrorKind::InvalidInput, error.to_string())
            })?;
            let query = ListQuery::new(resource)
                .with_pagination(pagination)
                .with_sort(Sort::new(sort_field, sort_order))
                .with_filter(filter.unwrap_or_default());
            let result = api.get_list(&query).await.map_err(api_failure)?;
            serde_json::to_value(result).map_err(io::Error::other)?
        }
        Command::Get { path, params } => api
            .get(&path, &params.unwrap_or_default())
            .await
            .map_err(api_failure)?,
        Command::Tree {
            component,
            id,
            direction,
        } => api
            .get_tree(&component, &id, direction)
            .await
            .map_err(api_failure)?,
        Command::Variables { id, parents } => api
            .get_variable_schema(&id, &parents)
            .await
            .map_err(api_failure)?,
        Command::Download { id, output } => {
            let bytes = api.download_file(&id).await.map_err(api_failure)?;
            write_file(&output, &bytes)?;
            println!("wrote {} bytes to {}", bytes.len(), output.display());
            return Ok(());
        }
        Command::Shell { .. } | Command::Css { .. } => return Ok(()),
    };

    print_json(&output)
}

fn render_shell(
    path: &str,
    permissions: Option<PermissionMap>,
    mount: Option<&str>,
) -> io::Result<()> {
    let shell = match mount {
        Some(raw) => NavigationShell::mounted(MountPath::new(raw)),
        None => NavigationShell::inferred(),
    };
    let state = permissions.map_or(ShellState::Loading, ShellState::Ready);
    let view = shell.render(&state, path);
    print_json(&serde_json::to_value(view).map_err(io::Error::other)?)
}

fn print_json(value: &Value) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{text}");
    Ok(())
}

fn api_failure(error: infrakitchen::domain::ApiError) -> io::Error {
    io::Error::other(format!("InfraKitchen request failed: {error}"))
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "output path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open output directory '{}': {error}",
            parent.display()
        ))
    })?;
    directory.write(Path::new(file_name), bytes).map_err(|error| {
        io::Error::other(format!("write output file '{}': {error}", path.display()))
    })
}

fn parse_json_object(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("expected a JSON object".to_owned()),
        Err(error) => Err(format!("invalid JSON: {error}")),
    }
}

fn parse_permissions(raw: &str) -> Result<PermissionMap, String> {
    serde_json::from_str(raw).map_err(|error| format!("invalid permission map: {error}"))
}

fn parse_palette(raw: &str) -> Result<Palette, String> {
    serde_json::from_str(raw).map_err(|error| format!("invalid palette: {error}"))
}
