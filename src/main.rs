//! Weather Dashboard - OpenWeatherMap TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weather_dashboard::action::Action;
use weather_dashboard::api::{self, SearchOutcome, WeatherClient};
use weather_dashboard::components::{Component, Dashboard, DashboardProps};
use weather_dashboard::effect::Effect;
use weather_dashboard::history;
use weather_dashboard::logging;
use weather_dashboard::reducer::reducer;
use weather_dashboard::state::{AppState, Focus, SPINNER_TICK_MS, Units};

/// Weather Dashboard - current conditions and forecast from OpenWeatherMap
#[derive(Parser, Debug)]
#[command(name = "weather-dashboard")]
#[command(about = "Current conditions and a 5-day forecast from OpenWeatherMap")]
struct Args {
    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    /// Base URL of the OpenWeatherMap data API
    #[arg(long, default_value = api::DEFAULT_API_BASE)]
    api_base: String,

    /// City to look up on startup
    #[arg(long, short)]
    city: Option<String>,

    /// Initial unit system
    #[arg(long, short, value_enum, default_value_t = Units::Metric)]
    units: Units,

    /// Where recent searches are stored
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Where log output is appended (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(Clone, Debug)]
struct RuntimeConfig {
    client: WeatherClient,
    history_path: PathBuf,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DashboardComponentId {
    Dashboard,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DashboardContext {
    Search,
    Recent,
}

impl EventRoutingState<DashboardComponentId, DashboardContext> for AppState {
    fn focused(&self) -> Option<DashboardComponentId> {
        Some(DashboardComponentId::Dashboard)
    }

    fn modal(&self) -> Option<DashboardComponentId> {
        None
    }

    fn binding_context(&self, _id: DashboardComponentId) -> DashboardContext {
        match self.focus {
            Focus::Search => DashboardContext::Search,
            Focus::Recent => DashboardContext::Recent,
        }
    }

    fn default_context(&self) -> DashboardContext {
        DashboardContext::Search
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_key,
        api_base,
        city,
        units,
        history_file,
        log_file,
        debug: debug_args,
    } = Args::parse();

    logging::init(&log_file.unwrap_or_else(history::default_log_path))?;

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let config = RuntimeConfig {
        client: WeatherClient::new(api_base, api_key),
        history_path: history_file.unwrap_or_else(history::default_history_path),
    };

    let recent = history::load_or_default(&config.history_path);
    tracing::info!(
        history = %config.history_path.display(),
        recent = recent.len(),
        "starting weather dashboard"
    );

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(units, recent))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let initial_action = city.map(Action::SearchSubmit);
    let result = run_app(
        &mut terminal,
        &debug,
        store,
        initial_action,
        replay_actions,
        config,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct DashboardUi {
    dashboard: Dashboard,
}

impl DashboardUi {
    fn new() -> Self {
        Self {
            dashboard: Dashboard::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<DashboardComponentId>,
    ) {
        event_ctx.set_component_area(DashboardComponentId::Dashboard, area);

        let props = DashboardProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.dashboard.render(frame, area, props);
    }

    fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .dashboard
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    initial_action: Option<Action>,
    replay_actions: Vec<ReplayItem<Action>>,
    config: RuntimeConfig,
) -> io::Result<DebugRunOutput<AppState>> {
    let config = Arc::new(config);
    let ui = Rc::new(RefCell::new(DashboardUi::new()));
    let mut bus: EventBus<AppState, Action, DashboardComponentId, DashboardContext> =
        EventBus::new();
    let keybindings: Keybindings<DashboardContext> = Keybindings::new();

    let ui_dashboard = Rc::clone(&ui);
    bus.register(DashboardComponentId::Dashboard, move |event, state| {
        ui_dashboard.borrow_mut().handle_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            initial_action,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &config),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, config: &RuntimeConfig) {
    match effect {
        Effect::FetchWeather {
            city,
            units,
            generation,
        } => {
            tracing::info!(%city, units = units.as_query(), generation, "fetching weather");
            let client = config.client.clone();
            ctx.tasks().spawn(TaskKey::new("weather"), async move {
                let outcome = client.search(&city, units).await;
                match &outcome {
                    SearchOutcome::Complete { forecast, .. } => {
                        tracing::info!(%city, generation, slots = forecast.entries.len(), "weather loaded");
                    }
                    SearchOutcome::ForecastFailed { error, .. } => {
                        tracing::warn!(%city, generation, %error, "forecast fetch failed");
                    }
                    SearchOutcome::Failed(error) => {
                        tracing::warn!(%city, generation, %error, "current conditions fetch failed");
                    }
                }
                outcome.into_action(generation, city)
            });
        }
        Effect::SaveRecentSearches { cities } => {
            if let Err(error) = history::save(&config.history_path, &cities) {
                tracing::warn!(%error, "failed to save recent searches");
            }
        }
    }
}
