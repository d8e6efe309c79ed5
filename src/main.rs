use chrono::Local;
use clap::Parser;
use crossbeam::channel::unbounded;
use midistate::{
    cli::{handle_device_list, validate_device, Args},
    config::Settings,
    logging,
    midi::DefaultMidiEngine,
    spawn_engine_pump, EventLoop, InputRegistry,
};

fn main() {
    let args = parse_command_line_arguments();
    let settings = load_settings(&args);
    initialize_logging(&settings, args.verbose);
    let devices = get_available_devices();

    if args.device_list {
        list_available_devices(&devices);
        return;
    }

    let Some(device_name) = settings.device.clone() else {
        exit_with_error("Error: no device given, use --bind-to-device or set `device`");
    };

    if let Err(error_msg) = validate_device(&device_name, &devices) {
        exit_with_error(&error_msg);
    }

    let engine = match DefaultMidiEngine::new(Some(device_name.clone()), &settings.client_name) {
        Ok(engine) => engine,
        Err(e) => exit_with_error(&format!("Error connecting to MIDI device: {}", e)),
    };
    log::info!("Successfully connected to MIDI device: {}", device_name);

    let mut registry = InputRegistry::new();
    if let Some(port_name) = engine.input_port_name() {
        println!("Monitoring {}", port_name);
        attach_printers(&mut registry, port_name, settings.print_json);
    }

    let (event_tx, event_rx) = unbounded();
    let pump = spawn_engine_pump(engine, event_tx);

    println!("\nPress Ctrl+C to exit...");
    EventLoop::new(registry, event_rx).run();

    if pump.join().is_err() {
        log::error!("MIDI engine thread panicked");
    }
    log::info!("Application stopped");
}

fn parse_command_line_arguments() -> Args {
    Args::parse()
}

fn load_settings(args: &Args) -> Settings {
    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => exit_with_error(&format!("Error loading settings: {}", e)),
    };
    args.apply_to(&mut settings);
    settings
}

fn initialize_logging(settings: &Settings, verbose: bool) {
    let level = settings
        .level_filter()
        .expect("log level was validated when settings were loaded");
    logging::init_logger(level, verbose).expect("Logger initialization failed");
    log::info!("Application starting");
    log::debug!("Running with settings: {:?}", settings);
}

fn get_available_devices() -> Vec<String> {
    handle_device_list()
}

fn list_available_devices(devices: &[String]) {
    println!("Available MIDI devices:");
    for device in devices {
        println!("  - {}", device);
    }
}

fn attach_printers(registry: &mut InputRegistry, device_id: &str, print_json: bool) {
    registry.add_message_listener(device_id, |message| {
        println!("{} {}", Local::now().format("%H:%M:%S%.3f"), message);
    });

    if print_json {
        registry.add_state_change_listener(device_id, |input| match input.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize {}: {}", input.id, e),
        });
    }
}

fn exit_with_error(error_msg: &str) -> ! {
    log::error!("{}", error_msg);
    eprintln!("{}", error_msg);
    std::process::exit(1);
}
