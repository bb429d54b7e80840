//! View, route and environment commands.

use serde::Serialize;
use tabled::Tabled;

use voglander_core::{App, RouteTable};

use crate::cli::GlobalOpts;
use crate::config::{Environment, Resolved};
use crate::error::CliError;
use crate::output;

// ── Open ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Rendered {
    path: String,
    content: String,
}

/// Resolve `path` and print the rendered view.
pub async fn open(app: &App, path: String, global: &GlobalOpts) -> Result<(), CliError> {
    let content = app.navigate(&path).await?;
    let rendered = Rendered { path, content };
    let out = output::render_single(
        &global.output,
        &rendered,
        |r| r.content.clone(),
        |r| r.content.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Routes ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Serialize, Tabled)]
struct RouteRow {
    #[tabled(rename = "Path")]
    path: &'static str,
    #[tabled(rename = "View")]
    name: &'static str,
    #[tabled(rename = "Loading")]
    loading: &'static str,
}

fn route_rows(table: &RouteTable) -> Vec<RouteRow> {
    table
        .routes()
        .iter()
        .map(|r| RouteRow {
            path: r.path,
            name: r.name,
            loading: if r.is_lazy() { "lazy" } else { "eager" },
        })
        .collect()
}

pub fn routes(global: &GlobalOpts) {
    let rows = route_rows(&RouteTable::standard());
    let out = output::render_list(&global.output, &rows, |r| *r, |r| r.path.to_owned());
    output::print_output(&out, global.quiet);
}

// ── Env ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct EnvInfo {
    title: String,
    mode: String,
    profile: String,
    api_base_url: String,
    env_base_url: String,
    timeout_secs: u64,
    token_file: String,
}

impl EnvInfo {
    fn new(env: &Environment, resolved: &Resolved) -> Self {
        Self {
            title: env.title.clone(),
            mode: env.mode.to_string(),
            profile: resolved.profile_name.clone(),
            api_base_url: resolved.app.api_base_url.to_string(),
            env_base_url: env.api_base_url.to_string(),
            timeout_secs: resolved.app.timeout.as_secs(),
            token_file: resolved.token_path.display().to_string(),
        }
    }
}

fn env_detail(info: &EnvInfo) -> String {
    [
        format!("Title:      {}", info.title),
        format!("Mode:       {}", info.mode),
        format!("Profile:    {}", info.profile),
        format!("API base:   {}", info.api_base_url),
        format!("Env origin: {}", info.env_base_url),
        format!("Timeout:    {}s", info.timeout_secs),
        format!("Token file: {}", info.token_file),
    ]
    .join("\n")
}

pub fn env(env: &Environment, resolved: &Resolved, global: &GlobalOpts) {
    let info = EnvInfo::new(env, resolved);
    let out = output::render_single(&global.output, &info, env_detail, |i| {
        i.api_base_url.clone()
    });
    output::print_output(&out, global.quiet);
}
