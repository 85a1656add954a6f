use anyhow::Result;
use clap::Parser;
use saferoute_cli::PlanningClient;
use saferoute_core::{LocationDescriptor, PlanStatus};

#[derive(Parser, Debug)]
#[command(author, version, about = "Request a hazard-free route", long_about = None)]
struct Args {
    /// Start location: "lat,lon" or a place name
    #[arg(long)]
    start: LocationDescriptor,

    /// End location: "lat,lon" or a place name
    #[arg(long)]
    end: LocationDescriptor,

    /// SafeRoute Server URL
    #[arg(long, default_value = "http://localhost:5000")]
    url: String,

    /// Print every route point
    #[arg(long)]
    points: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = PlanningClient::new(args.url);

    println!("Planning route...");
    let response = client.plan(args.start, args.end).await?;

    match response.status {
        PlanStatus::Safe => {
            println!("Safe route found after {} attempt(s)", response.attempts);
            if let Some(route) = &response.route {
                println!("Route: {} points", route.len());
                if let Some(summary) = &route.summary {
                    println!(
                        "Distance: {:.2} km, duration: {:.0} min",
                        summary.distance_m / 1000.0,
                        summary.duration_s / 60.0
                    );
                }
                if let (Some(first), Some(last)) = (route.points.first(), route.points.last()) {
                    println!("Start: {}, {}", first.lat(), first.lon());
                    println!("End: {}, {}", last.lat(), last.lon());
                }
                if args.points {
                    for point in &route.points {
                        println!("  {}, {}", point.lat(), point.lon());
                    }
                }
            }
        }
        PlanStatus::Unsafe
        | PlanStatus::GeocodingFailed
        | PlanStatus::RouteProviderFailed => {
            eprintln!(
                "No route ({:?}): {}",
                response.status,
                response.message.as_deref().unwrap_or("no details")
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
