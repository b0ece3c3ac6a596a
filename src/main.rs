use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use sentidash::{App, AppConfig, AppEvent, Args, ConfigManager, FilterValue, HttpGateway, Theme};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, args: &Args, config: AppConfig) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    let gateway = Arc::new(HttpGateway::from_config(&config.gateway));
    tracing::info!(base_url = gateway.base_url(), "starting dashboard");

    let theme = Theme::from_config(&config.theme)?;
    let mut app = App::new_with_config(tx.clone(), gateway, theme, config);
    if args.debug {
        app.enable_debug();
    }
    let poll_interval = app.poll_interval();
    let auto_refresh = app.auto_refresh_interval();
    let mut last_auto_refresh = Instant::now();

    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::Start(args.filter.clone().map(FilterValue::new)))?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        if let Some(interval) = auto_refresh {
            if last_auto_refresh.elapsed() >= interval {
                last_auto_refresh = Instant::now();
                tx.send(AppEvent::AutoRefresh)?;
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        match ConfigManager::new(sentidash::APP_NAME) {
            Ok(manager) => match manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Wrote default configuration to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing config: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;

    let mut config = AppConfig::load(sentidash::APP_NAME)?;
    config.apply_args(&args);
    config.validate()?;

    if let Err(e) = sentidash::logging::init(&config.logging) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let terminal = ratatui::init();
    let result = run(terminal, &args, config);
    ratatui::restore();
    if let Err(e) = result {
        tracing::error!(error = %e, "dashboard exited with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
