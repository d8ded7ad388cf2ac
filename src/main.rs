mod app;
mod net;
mod util;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Network file in *Vertices/*States/*Links format.
    #[arg(long, default_value = "example.net")]
    net: String,
    /// Hierarchical partition (.tree) file. Defaults to the network filename
    /// with its extension replaced by `_states.tree`.
    #[arg(long)]
    tree: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let tree = args
        .tree
        .unwrap_or_else(|| net::default_tree_name(&args.net));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "state network visualizer",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::StateNetworkApp::new(
                cc,
                args.net.clone(),
                tree.clone(),
            )))
        }),
    )
}
