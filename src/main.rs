use eframe::egui;

use speedpixels::{app::SpeedPixelsApp, cli, logger};

fn main() -> Result<(), eframe::Error> {
    // -- CLI / headless mode ---------------------------------------------
    if cli::CliArgs::is_cli_mode() {
        use clap::Parser;
        let args = cli::CliArgs::parse();
        std::process::exit(cli::run(args));
    }

    // -- GUI mode ---------------------------------------------------------

    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("SpeedPixels"),
        ..Default::default()
    };

    eframe::run_native(
        "SpeedPixels",
        options,
        Box::new(|cc| Box::new(SpeedPixelsApp::new(cc))),
    )
}
