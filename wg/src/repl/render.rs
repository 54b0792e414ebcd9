//! Terminal rendering for plans, bookings and notices

use colored::Colorize;

use crate::api::{
    Activity, BudgetOptimization, CulturalInsights, Flight, FlightLeg, Hotel, Itinerary, Recommendation,
    TripRequest, WeatherForecast,
};
use crate::notify::{Notice, NoticeLevel, Notifier};
use crate::wizard::{FlightSort, HotelSort, TripResults, filter_hotels_by_stars, option_label, sort_flights, sort_hotels};

/// Notifier that prints to the terminal
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(level = ?notice.level, title = %notice.title, "TerminalNotifier::notify: called");
        print_notice(&notice);
    }
}

pub fn print_notice(notice: &Notice) {
    let title = match notice.level {
        NoticeLevel::Success => format!("✓ {}", notice.title).bright_green().bold(),
        NoticeLevel::Info => notice.title.bright_cyan().bold(),
        NoticeLevel::Warning => format!("! {}", notice.title).yellow().bold(),
        NoticeLevel::Error => format!("✗ {}", notice.title).red().bold(),
    };
    if notice.message.is_empty() {
        println!("{}", title);
    } else {
        println!("{} {}", title, notice.message);
    }
}

fn heading(text: &str) {
    println!();
    println!("{}", text.bright_cyan().bold());
}

fn bullets(items: &[String]) {
    for item in items {
        println!("  • {}", item);
    }
}

pub fn print_trip_summary(trip: &TripRequest) {
    heading("Trip Summary");
    let from = if trip.origin.trim().is_empty() { "-" } else { trip.origin.as_str() };
    println!("  {:14} {}", "From:".dimmed(), from);
    println!("  {:14} {}", "To:".dimmed(), trip.destination);
    println!("  {:14} {} to {}", "Dates:".dimmed(), trip.departure_date, trip.return_date);
    println!("  {:14} {}", "Duration:".dimmed(), format!("{} days", trip.duration));
    println!("  {:14} {}", "Travelers:".dimmed(), trip.travelers);
    println!("  {:14} ${:.0}", "Budget:".dimmed(), trip.budget);
    println!("  {:14} {}", "Style:".dimmed(), trip.travel_style.label());
    if !trip.interests.is_empty() {
        let interests: Vec<&str> = trip.interests.iter().map(String::as_str).collect();
        println!("  {:14} {}", "Interests:".dimmed(), interests.join(", "));
    }
}

pub fn print_itinerary(itinerary: &Itinerary) {
    heading("Itinerary");
    if !itinerary.overview.is_empty() {
        println!("  {}", itinerary.overview);
    }
    println!(
        "  {} ${:.0}",
        "Total estimated cost:".dimmed(),
        itinerary.total_estimated_cost
    );

    for day in &itinerary.days {
        println!();
        println!("  {} {}", format!("Day {}", day.day).bright_yellow().bold(), day.title.bold());
        for (part, text) in [("Morning", &day.morning), ("Afternoon", &day.afternoon), ("Evening", &day.evening)] {
            if !text.is_empty() {
                println!("    {:10} {}", format!("{}:", part).dimmed(), text);
            }
        }
        println!("    {:10} ${:.0}", "Cost:".dimmed(), day.estimated_cost);
        if let Some(tips) = &day.tips {
            println!("    {:10} {}", "Tip:".dimmed(), tips.italic());
        }
    }

    if !itinerary.packing_suggestions.is_empty() {
        heading("Packing Suggestions");
        bullets(&itinerary.packing_suggestions);
    }
    if !itinerary.cultural_tips.is_empty() {
        heading("Cultural Tips");
        bullets(&itinerary.cultural_tips);
    }
}

fn leg_line(label: &str, leg: &FlightLeg) -> String {
    let stops = match leg.stops {
        0 => "nonstop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    };
    format!(
        "{} {} {} → {} {} ({}, {})",
        label,
        leg.departure.airport,
        leg.departure.time,
        leg.arrival.airport,
        leg.arrival.time,
        leg.duration,
        stops
    )
}

pub fn print_flights(flights: &[&Flight], sort: FlightSort) {
    heading(&format!("Flights ({}, sorted by {})", flights.len(), sort));
    if flights.is_empty() {
        println!("  {}", "No flights found.".dimmed());
        return;
    }
    for (index, flight) in flights.iter().enumerate() {
        let label = option_label(index).map(|l| format!(" [{}]", l).bright_green().to_string()).unwrap_or_default();
        println!(
            "  {}. {} {} {} {}{}",
            index + 1,
            flight.airline.bold(),
            flight.outbound.flight_number,
            format!("{} {:.0}", flight.price.currency, flight.price.amount).bright_white(),
            format!("★ {:.1} ({} reviews)", flight.rating, flight.reviews).yellow(),
            label
        );
        println!("     {}", leg_line("Out:", &flight.outbound));
        if let Some(leg) = &flight.return_leg {
            println!("     {}", leg_line("Back:", leg));
        }
    }
}

pub fn print_hotels(hotels: &[&Hotel], sort: HotelSort, stars: u8) {
    let filter = if stars == 0 { String::new() } else { format!(", {} stars", stars) };
    heading(&format!("Hotels ({}, sorted by {}{})", hotels.len(), sort, filter));
    if hotels.is_empty() {
        println!("  {}", "No hotels match.".dimmed());
        return;
    }
    for (index, hotel) in hotels.iter().enumerate() {
        let label = option_label(index).map(|l| format!(" [{}]", l).bright_green().to_string()).unwrap_or_default();
        println!(
            "  {}. {} {} {}{}",
            index + 1,
            hotel.name.bold(),
            "★".repeat(usize::from(hotel.rating)).yellow(),
            format!("{} {:.0}/night", hotel.price.currency, hotel.price.nightly_rate).bright_white(),
            label
        );
        let mut details = vec![hotel.location.district.clone(), hotel.location.distance_to_center.clone()];
        details.retain(|d| !d.is_empty());
        if !details.is_empty() {
            println!("     {}", details.join(" · ").dimmed());
        }
        if hotel.review_score > 0.0 {
            println!(
                "     {} {:.1} ({} reviews), total {} {:.0}",
                "Guests rate it".dimmed(),
                hotel.review_score,
                hotel.review_count,
                hotel.price.currency,
                hotel.price.total
            );
        }
    }
}

pub fn print_insights(insights: &CulturalInsights) {
    let sections = [
        ("Customs", &insights.customs),
        ("Etiquette", &insights.etiquette),
        ("Safety", &insights.safety_tips),
        ("Local Insights", &insights.local_insights),
    ];
    for (title, items) in sections {
        if !items.is_empty() {
            heading(title);
            bullets(items);
        }
    }
    if !insights.basic_phrases.is_empty() {
        heading("Basic Phrases");
        for (phrase, translation) in &insights.basic_phrases {
            println!("  {:20} {}", phrase, translation.italic());
        }
    }
    if !insights.tipping_guide.is_empty() {
        heading("Tipping");
        println!("  {}", insights.tipping_guide);
    }
}

/// Full results view
pub fn print_results(results: &TripResults, flight_sort: FlightSort, hotel_sort: HotelSort, stars: u8) {
    print_itinerary(results.itinerary());
    print_flights(&sort_flights(results.flights(), flight_sort), flight_sort);
    let hotels = sort_hotels(results.hotels(), hotel_sort);
    print_hotels(&filter_hotels_by_stars(&hotels, stars), hotel_sort, stars);
    print_insights(results.cultural());
    println!();
}

pub fn print_activities(activities: &[Activity]) {
    heading(&format!("Activities ({})", activities.len()));
    for activity in activities {
        println!(
            "  {} {} {}",
            activity.name.bold(),
            format!("{} {:.0}", activity.currency, activity.price).bright_white(),
            format!("★ {:.1}", activity.rating).yellow()
        );
        if !activity.description.is_empty() {
            println!("     {}", activity.description);
        }
        if !activity.duration.is_empty() {
            println!("     {} {}", "Duration:".dimmed(), activity.duration);
        }
    }
}

pub fn print_recommendations(title: &str, recommendations: &[Recommendation]) {
    heading(&format!("{} ({})", title, recommendations.len()));
    for rec in recommendations {
        let setting = if rec.indoor { "indoor" } else { "outdoor" };
        println!("  {} {}", rec.name.bold(), format!("({})", setting).dimmed());
        if !rec.description.is_empty() {
            println!("     {}", rec.description);
        }
        let mut facts = vec![rec.duration.clone(), rec.cost_estimate.clone(), rec.best_time.clone()];
        facts.retain(|f| !f.is_empty());
        if !facts.is_empty() {
            println!("     {}", facts.join(" · ").dimmed());
        }
    }
}

pub fn print_forecast(destination: &str, forecast: &[WeatherForecast]) {
    heading(&format!("Weather for {}", destination));
    for day in forecast {
        println!(
            "  {:12} {:16} {:.0}/{:.0}{}  {}",
            day.date,
            day.condition,
            day.temperature.high,
            day.temperature.low,
            day.temperature.unit,
            format!("rain {:.0}%, humidity {:.0}%, wind {:.0}", day.precipitation, day.humidity, day.wind_speed)
                .dimmed()
        );
    }
}

pub fn print_optimization(report: &BudgetOptimization) {
    heading("Budget Optimization");
    println!(
        "  {} ${:.0}   {} ${:.0}",
        "Revised total:".dimmed(),
        report.revised_total,
        "Estimated savings:".dimmed(),
        report.estimated_savings
    );
    for cut in &report.optimizations {
        println!();
        println!(
            "  {} ${:.0} → ${:.0}",
            cut.category.bold(),
            cut.current_cost,
            cut.suggested_cost
        );
        bullets(&cut.suggestions);
    }
    if report.itinerary.is_some() {
        println!();
        println!("  {}", "A revised itinerary was included and saved.".bright_green());
    }
}
