//! Demo driver-engine binary.
//!
//! Wires a CLI-configured transport to the driver engine and a trivial
//! [`Host`] that logs every input callback instead of feeding a real scene
//! graph. Useful for exercising a renderer (or the test harness in
//! `remote-transport`) against a real running engine.

use std::time::Duration;

use bytes::Bytes;
use clap::Parser;
use remote_core::{ColorInput, CursorButton, Host, ImageAsset, KeyAction, Modifier};
use remote_driver::{Args, engine};
use remote_proto::AssetId;
use tracing::{error, info};

/// A [`Host`] with no scenes of its own: every asset lookup misses, every
/// input callback is logged and discarded.
struct DemoHost;

impl Host for DemoHost {
    fn fetch_script(&self, _id: &AssetId) -> Option<Bytes> {
        None
    }

    fn fetch_font(&self, _id: &AssetId) -> Option<Bytes> {
        None
    }

    fn fetch_image(&self, _id: &AssetId) -> Option<ImageAsset> {
        None
    }

    fn script_media_refs(&self, _script: &Bytes) -> remote_core::MediaRefs {
        remote_core::MediaRefs::default()
    }

    fn live_script_ids(&self) -> Vec<AssetId> {
        Vec::new()
    }

    fn on_reshape_input(&mut self, width: f32, height: f32) {
        info!(width, height, "reshape");
    }

    fn on_cursor_button(&mut self, button: CursorButton, pressed: bool, mods: &[Modifier], x: f32, y: f32) {
        info!(?button, pressed, ?mods, x, y, "cursor button");
    }

    fn on_cursor_pos(&mut self, x: f32, y: f32) {
        info!(x, y, "cursor move");
    }

    fn on_key(&mut self, key: u32, scancode: u32, action: KeyAction, mods: &[Modifier]) {
        info!(key, scancode, ?action, ?mods, "key");
    }

    fn on_codepoint(&mut self, codepoint: u32, mods: &[Modifier]) {
        info!(codepoint, ?mods, "codepoint");
    }

    fn on_scroll(&mut self, x_off: f32, y_off: f32, x: f32, y: f32) {
        info!(x_off, y_off, x, y, "scroll");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = match args.into_engine_config() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            std::process::exit(1);
        },
    };

    info!(transport = ?config.transport, "starting driver engine");
    let handle = engine::spawn(config, DemoHost);

    // Demonstrate the clear-color host call, then idle: the engine task
    // itself owns the connection lifecycle from here on.
    handle.clear_color(ColorInput { r: remote_core::ColorChannel::Int(30), g: remote_core::ColorChannel::Int(30), b: remote_core::ColorChannel::Int(30), a: None }).await;

    loop {
        tokio::time::sleep(Duration::from_secs(3600)).await;
    }
}
