//! Minimal end-to-end tour: configure a backend, create a couple of
//! listings, and render the buy view.
//!
//! ```sh
//! RUST_LOG=bookswap=debug cargo run --example quickstart
//! ```

use bookswap::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Swap `kind: memory` for `local` or `remote` without touching anything below.
    let config = SwapConfig::from_yaml_str(
        r#"
backend:
  kind: memory
image:
  max_bytes: 2097152
"#,
    )?;
    let adapter = build_adapter(&config).await?;
    let updates = adapter.subscribe();

    let identity = SessionIdentity::named("ana");

    let cover = ImageFile::new("cover.png", vec![0x89, b'P', b'N', b'G', 0, 0, 0, 0]);
    let id = adapter
        .create(
            ListingDraft {
                owner: identity.display_name().to_string(),
                title: "Intro to Algorithms".to_string(),
                author: "Cormen".to_string(),
                price: 250.0,
                condition: "good".to_string(),
                location: "Lisbon".to_string(),
                coordinates: Some(Coordinates { lat: 38.7223, lon: -9.1393 }),
                phone: "912345678".to_string(),
            },
            &[cover.clone()],
        )
        .await?;

    adapter
        .create(
            ListingDraft {
                owner: "bo".to_string(),
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                price: 120.0,
                condition: "worn".to_string(),
                location: "Porto".to_string(),
                coordinates: Some(Coordinates { lat: 41.1579, lon: -8.6291 }),
                phone: "934567890".to_string(),
            },
            &[cover],
        )
        .await?;

    let mut view = ViewController::new(identity);
    view.apply_snapshot(updates.borrow().clone());
    view.highlight(id);

    println!("— all listings, newest first —");
    for card in view.cards() {
        let mine = if card.editable { " [edit] [delete]" } else { "" };
        let fresh = if card.highlighted { " ✨" } else { "" };
        println!("  {} by {} — {:.2}{}{}", card.title, card.author, card.price, mine, fresh);
    }

    view.set_search("dune");
    println!("— search: dune —");
    for card in view.cards() {
        println!("  {} by {}", card.title, card.author);
    }
    view.clear_search();

    view.set_proximity(Coordinates { lat: 38.7223, lon: -9.1393 }, Some("Lisbon".to_string()));
    println!("— near me —");
    for card in view.cards() {
        match card.distance_km {
            Some(km) => println!("  {} ({:.0} km)", card.title, km),
            None => println!("  {} (distance unknown)", card.title),
        }
    }

    Ok(())
}
