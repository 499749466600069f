//! Print every hardware MIDI input and the events it produces.
//!
//! ```bash
//! cargo run -p midisense-io --example list_inputs
//! ```

use midisense_io::{MidiAccess, MidiListener};
use std::time::Duration;

fn main() -> midisense_io::Result<()> {
    tracing_subscriber::fmt::init();

    let listener = MidiListener::builder()
        .io()
        .client_name("list-inputs")
        .poll_interval(Duration::from_millis(250))
        .on_input_change(|change| {
            println!("=== MIDI Inputs ===");
            if change.input_names.is_empty() {
                println!("  (none found)");
            }
            for (i, name) in change.input_names.iter().enumerate() {
                println!("  [{}] {}", i, name);
            }
        })
        .on_note(|note| {
            println!(
                "note {:?} velocity {:?} ({:?} Hz)",
                note.code, note.velocity, note.frequency
            )
        })
        .on_pad(|pad| println!("pad {:?} velocity {:?}", pad.code, pad.velocity))
        .on_pitch_bend(|bend| println!("pitch bend {:?}", bend.value))
        .on_mod_wheel(|wheel| println!("mod wheel {:?}", wheel.value))
        .build()?;

    for port in listener.access().inputs() {
        println!(
            "  {} ({}) {:?}/{:?}",
            port.id, port.manufacturer, port.state, port.connection
        );
    }

    println!("\nListening for 30 seconds...");
    std::thread::sleep(Duration::from_secs(30));
    Ok(())
}
