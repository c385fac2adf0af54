use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use opsdesk_core::booking::Booking;
use std::path::Path;

#[derive(Subcommand)]
pub enum BookingSubcommand {
    /// List bookings
    List {
        /// Only this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Cancel a booking
    Cancel { id: String },
    /// Mark a booking completed
    Complete { id: String },
}

pub fn run(root: &Path, subcmd: BookingSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        BookingSubcommand::List { date } => list(root, date, json),
        BookingSubcommand::Cancel { id } => cancel(root, &id, json),
        BookingSubcommand::Complete { id } => complete(root, &id, json),
    }
}

fn list(root: &Path, date: Option<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let bookings: Vec<Booking> = Booking::list(root)?
        .into_iter()
        .filter(|b| date.is_none_or(|d| b.date == d))
        .collect();

    if json {
        print_json(&bookings)?;
        return Ok(());
    }

    let rows = bookings
        .iter()
        .map(|b| {
            vec![
                b.id.clone(),
                b.schedule_slug.clone(),
                b.date.to_string(),
                b.start.format("%H:%M").to_string(),
                b.status.to_string(),
                b.name.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "SCHEDULE", "DATE", "START", "STATUS", "WITH"], rows);
    Ok(())
}

fn cancel(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let mut booking = Booking::load(root, id).context("booking not found")?;
    booking.cancel();
    booking.save(root)?;

    if json {
        print_json(&booking)?;
    } else {
        println!(
            "Cancelled {} {} on {}",
            booking.date,
            booking.start.format("%H:%M"),
            booking.schedule_slug
        );
    }
    Ok(())
}

fn complete(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let mut booking = Booking::load(root, id).context("booking not found")?;
    booking.complete();
    booking.save(root)?;

    if json {
        print_json(&booking)?;
    } else {
        println!("Completed booking {}", booking.id);
    }
    Ok(())
}
