//! Headless scripted demo: plays one round against the clock and prints the
//! resulting machine state as JSON. The windowed game lives in `bin/headful`.

use engine::HeadlessRunner;
use game::machine::GamePhase;
use game::scripted::{ScriptEvent, WheelLogic, tick_script};

fn main() {
    let mut runner = HeadlessRunner::new(WheelLogic::new(0xC0FFEE));

    runner.step(ScriptEvent::Start(0));
    // One element takes 500ms gap + 600ms flash + 500ms trailing gap.
    runner.run(tick_script(0, 2_000, 50));
    assert_eq!(runner.state().phase(), GamePhase::Input);

    // Reproduce the sequence.
    let first = runner.state().sequence()[0];
    runner.step(ScriptEvent::Select(first, 2_050));

    println!(
        "frames {} level {} phase {:?}",
        runner.frame(),
        runner.state().level(),
        runner.state().phase()
    );
    match serde_json::to_string_pretty(runner.state()) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("state serialization failed: {err}"),
    }
}
