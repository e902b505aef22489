//! Command-line walkthrough of the showcase.
//!
//! Browses the catalog, signs in, writes a review and opens the admin
//! dashboard, logging each step.

use anyhow::Context;
use std::time::Duration;
use tamil_tours_showcase::{
    CategoryFilter, Credentials, ReviewDraft, ReviewFilter, ReviewSort, ShowcaseConfig, TourId,
    TourSort, TourismApp,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ShowcaseConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(config.log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        seed = ?config.seed_path,
        token_store = %config.storage.path.display(),
        latency_ms = config.auth.latency_ms,
        "Configuration loaded"
    );

    let app = TourismApp::from_config(&config).context("failed to start the showcase")?;

    println!("=== Tamil Tours ===\n");

    let session = app.session().await;
    match &session.user {
        Some(user) if session.is_authenticated() => println!("Welcome back, {}", user.name),
        _ => println!("Browsing as a guest"),
    }

    // Catalog
    for name in ["All", "Nature", "Resorts"] {
        let tours = app.select_category(CategoryFilter::parse(name)).await?;
        println!("{name}: {} tours", tours.len());
    }

    app.select_category(CategoryFilter::All).await?;
    println!("\nTop rated:");
    for tour in app.visible_tours("", Some(TourSort::Rating)).await.iter().take(3) {
        println!("  {:.1}  {} ({}, {})", tour.rating, tour.title, tour.district, tour.duration);
    }

    // Session
    let user = app
        .sign_in(Credentials::new(config.auth.admin_email.clone(), "tamilnadu"))
        .await
        .context("sign-in failed")?;
    println!("\nSigned in as {} ({})", user.name, user.role);

    // Feedback
    let review = app
        .submit_review(ReviewDraft::new(
            TourId::new("6"),
            5,
            "The palace art gallery commentary was superb.",
        ))
        .await?;
    println!("Reviewed {} as {}", review.tour_title, review.author_name);

    match app
        .submit_review(ReviewDraft::new(TourId::new("6"), 5, "Great!"))
        .await
    {
        Ok(_) => println!("Short review accepted"),
        Err(error) => println!("Short review rejected: {error}"),
    }

    println!("\nFive-star reviews, newest first:");
    for review in app
        .reviews(&ReviewFilter::new().with_rating(5), ReviewSort::Newest)
        .await
    {
        println!("  {}  {} on {}", review.date, review.author_name, review.tour_title);
    }

    // Admin
    let dashboard = app.admin_dashboard().await?;
    println!(
        "\nDashboard: {} tours, {} reviews, average {:.2}",
        dashboard.active_tours,
        dashboard.total_reviews,
        dashboard.ratings.average.unwrap_or_default()
    );
    for bucket in dashboard.ratings.buckets {
        println!("  {} stars: {:>2} ({:.0}%)", bucket.stars, bucket.count, bucket.percentage);
    }

    app.logout().await?;
    println!("\nSigned out");

    app.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
