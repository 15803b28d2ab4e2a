//! Car listing for visitors and catalog management for administrators.

use anyhow::Result;
use tracing::{info, warn};

use crate::models::{Car, RawCar};
use crate::normalize::normalize_car;
use crate::services::reviews_api::{CatalogAdminApi, ReviewsApi};
use crate::session::Session;
use crate::submission::CarDraft;

/// Normalizes a listing, skipping cars without an identifier.
pub fn normalize_listing(raw: Vec<RawCar>) -> Vec<Car> {
    raw.into_iter()
        .filter_map(|car| match normalize_car(car) {
            Ok(car) => Some(car),
            Err(e) => {
                warn!(error = %e, "Rejected car record");
                None
            }
        })
        .collect()
}

/// Every car, active or not. What the admin dashboard shows.
#[tracing::instrument(skip(api))]
pub async fn list_all_cars<A>(api: &A) -> Result<Vec<Car>>
where
    A: ReviewsApi + ?Sized,
{
    Ok(normalize_listing(api.list_cars().await?))
}

/// Cars visitors can browse.
#[tracing::instrument(skip(api))]
pub async fn list_active_cars<A>(api: &A) -> Result<Vec<Car>>
where
    A: ReviewsApi + ?Sized,
{
    let cars = list_all_cars(api).await?;
    let total = cars.len();
    let active: Vec<Car> = cars.into_iter().filter(|c| c.active).collect();
    info!(total, active = active.len(), "Car listing loaded");
    Ok(active)
}

/// Case-insensitive substring match on brand or model. An empty query matches all.
pub fn search_cars<'a>(cars: &'a [Car], query: &str) -> Vec<&'a Car> {
    let query = query.to_lowercase();
    cars.iter()
        .filter(|c| {
            c.brand.to_lowercase().contains(&query) || c.model.to_lowercase().contains(&query)
        })
        .collect()
}

/// Creates a car (`car_id` is `None`) or updates one.
#[tracing::instrument(skip(api, session, draft))]
pub async fn save_car<A>(
    api: &A,
    session: &Session,
    car_id: Option<&str>,
    draft: &CarDraft,
) -> Result<()>
where
    A: CatalogAdminApi + ?Sized,
{
    session.require_admin()?;
    draft.validate(car_id.is_none())?;
    api.save_car(session, car_id, draft).await?;
    info!(created = car_id.is_none(), "Car saved");
    Ok(())
}

#[tracing::instrument(skip(api, session))]
pub async fn delete_car<A>(api: &A, session: &Session, car_id: &str) -> Result<()>
where
    A: CatalogAdminApi + ?Sized,
{
    session.require_admin()?;
    api.delete_car(session, car_id).await?;
    info!("Car deleted");
    Ok(())
}

/// Flips a car between listed and unlisted. Returns the new state.
#[tracing::instrument(skip(api, session, car), fields(car_id = %car.id))]
pub async fn toggle_car_active<A>(api: &A, session: &Session, car: &Car) -> Result<bool>
where
    A: CatalogAdminApi + ?Sized,
{
    session.require_admin()?;
    let active = !car.active;
    api.set_car_active(session, &car.id, active).await?;
    info!(active, "Car status changed");
    Ok(active)
}
