use bpm_dashboard::config::Config;
use bpm_dashboard::dashboard::{
    filter::{FilterWidget, StagedFilter, TextFilter},
    grid::NavKey,
    Dashboard, DashboardSettings,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &str = "Type a name to search (blank for everyone). \
:all shows the aggregate, :key <up|down|left|right|home|end|ctrl-home|ctrl-end> moves focus, :q quits.";

fn redraw(dashboard: &mut Dashboard) {
    println!("\n{}\n", dashboard.render());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("BPM_DASHBOARD_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = Config::load_or_default(&config_path)?;
    let settings = DashboardSettings::from_config(&cfg);

    let filter: Box<dyn FilterWidget> = match std::env::var("BPM_DASHBOARD_FILTER").as_deref() {
        Ok("staged") => Box::new(StagedFilter),
        _ => Box::new(TextFilter),
    };

    let mut dashboard = Dashboard::mount(&settings, filter)?;
    let mut fetch_rx = dashboard.fetch_changes();
    let mut health_rx = dashboard.health_changes();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut health_alive = true;

    println!("{}", HELP);
    redraw(&mut dashboard);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match line.trim() {
                    ":q" | ":quit" => break,
                    ":all" => {
                        dashboard.show_aggregate();
                    }
                    cmd if cmd.starts_with(":key") => {
                        match NavKey::parse(cmd.trim_start_matches(":key")) {
                            Some(key) => {
                                dashboard.navigate(key);
                                redraw(&mut dashboard);
                            }
                            None => println!("{}", HELP),
                        }
                    }
                    _ => {
                        if dashboard.handle_input(&line).is_none() {
                            redraw(&mut dashboard);
                        }
                    }
                }
            }
            changed = fetch_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                redraw(&mut dashboard);
            }
            changed = health_rx.changed(), if health_alive => {
                match changed {
                    Ok(()) => redraw(&mut dashboard),
                    Err(_) => health_alive = false,
                }
            }
        }
    }

    dashboard.unmount().await;
    info!("Bye");
    Ok(())
}
