use opsdesk_core::booking::Booking;
use opsdesk_core::config::Config;
use opsdesk_core::key::SoftwareKey;
use opsdesk_core::member::Member;
use opsdesk_core::opportunity::{self, Opportunity};
use opsdesk_core::tracker::{self, TrackerItem};
use std::path::Path;

/// `opsdesk state` — dashboard summary.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let opportunities = Opportunity::list(root)?;
    let pipeline = opportunity::summarize(&opportunities);
    let items = TrackerItem::list(root)?;
    let members = Member::list(root)?;
    let keys = SoftwareKey::list(root)?;
    let bookings = Booking::list(root)?;

    if json {
        crate::output::print_json(&serde_json::json!({
            "project": config.project.name,
            "pipeline": pipeline,
            "tracker": tracker::summarize(&items),
            "counts": {
                "opportunities": opportunities.len(),
                "members": members.len(),
                "keys": keys.len(),
                "bookings": bookings.len(),
                "tracker_items": items.len(),
            },
        }))?;
        return Ok(());
    }

    println!("Project: {}", config.project.name);
    println!(
        "Pipeline: {} open (${:.0}, weighted ${:.0}), ${:.0} won",
        pipeline.open_count, pipeline.open_value, pipeline.weighted_value, pipeline.won_value
    );
    println!("Tracker: {}", tracker::summarize(&items));
    println!(
        "Records: {} members, {} keys, {} bookings",
        members.len(),
        keys.len(),
        bookings.len()
    );
    Ok(())
}
