//! Transform sheet rows and planner parameters into a routing request.
//!
//! Every function here is pure: the output depends only on the arguments,
//! including the plan date, which callers supply explicitly.

use chrono::NaiveDate;

use crate::error::BuildError;
use crate::input::{FleetRow, JobKind, JobRow};
use crate::params::{CostInputs, PlanParameters, Profile, check_fleet_parameter};
use crate::request::{
    DEFAULT_REQUEST_ID, Fleet, Job, JobPlace, Places, Plan, RoutingRequest, Shift, ShiftPoint,
    VehicleType,
};
use crate::timestamp::{job_timestamp, parse_time_of_day, shift_timestamp};

/// Build the shared vehicle shift for `date` between two whole hours.
///
/// Start and end positions come from the fleet descriptor. Columns missing
/// from the fleet sheet are reported by the sheet reader before a
/// [`FleetRow`] exists.
///
/// # Errors
///
/// Returns [`BuildError::InvalidShiftHours`] unless
/// `0 <= start_hour <= end_hour <= 23`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tourplan_core::{FleetRow, Location, build_shift_window};
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
/// let depot = Location::new(52.1, 5.1);
/// let fleet = FleetRow { shift_start: depot, shift_end: depot };
/// let shift = build_shift_window(date, 6, 23, &fleet)?;
/// assert_eq!(shift.start.time, "2024-05-01T06:00:00Z");
/// assert_eq!(shift.end.time, "2024-05-01T23:00:00Z");
/// # Ok::<(), tourplan_core::BuildError>(())
/// ```
pub fn build_shift_window(
    date: NaiveDate,
    start_hour: u8,
    end_hour: u8,
    fleet: &FleetRow,
) -> Result<Shift, BuildError> {
    let invalid = || BuildError::InvalidShiftHours {
        start: start_hour,
        end: end_hour,
    };
    if start_hour > end_hour {
        return Err(invalid());
    }
    let start = shift_timestamp(date, start_hour).ok_or_else(invalid)?;
    let end = shift_timestamp(date, end_hour).ok_or_else(invalid)?;
    Ok(Shift {
        start: ShiftPoint {
            time: start,
            location: fleet.shift_start,
        },
        end: ShiftPoint {
            time: end,
            location: fleet.shift_end,
        },
    })
}

/// Build the single vehicle type for `profile`.
///
/// Costs, capacity and count go through the profile's
/// [`UnitPolicy`](crate::UnitPolicy): cars get per-metre/per-second costs and
/// integer quantities, trucks get the inputs unchanged.
///
/// # Errors
///
/// Returns [`BuildError::InvalidFleetParameter`] when `capacity` or `amount`
/// is below one or above [`MAX_FLEET_PARAMETER`](crate::MAX_FLEET_PARAMETER).
pub fn build_vehicle_type(
    profile: Profile,
    costs: &CostInputs,
    capacity: f64,
    amount: f64,
    shift: Shift,
) -> Result<VehicleType, BuildError> {
    check_fleet_parameter("capacity", capacity)?;
    check_fleet_parameter("amount", amount)?;
    let policy = profile.unit_policy();
    Ok(VehicleType {
        id: profile.vehicle_id().to_owned(),
        profile: profile.profile_name().to_owned(),
        costs: policy.costs(costs),
        shifts: vec![shift],
        capacity: vec![policy.capacity.apply(capacity)],
        amount: policy.capacity.apply(amount),
    })
}

/// Build one job with a single time window on `date`.
///
/// # Errors
///
/// Returns [`BuildError::UnsupportedJobType`] for a `job_type` other than
/// `delivery` or `pickup`, and [`BuildError::InvalidTimeOfDay`] when a window
/// bound is not a time of day.
pub fn build_job(row: &JobRow, date: NaiveDate) -> Result<Job, BuildError> {
    let kind: JobKind = row
        .job_type
        .parse()
        .map_err(|_| BuildError::UnsupportedJobType {
            job_id: row.id.clone(),
            job_type: row.job_type.clone(),
        })?;
    let window = [
        window_bound(row, &row.start, date)?,
        window_bound(row, &row.end, date)?,
    ];
    let place = JobPlace {
        times: vec![window],
        location: row.location,
        duration: row.duration,
        demand: vec![row.demand],
    };
    let places = match kind {
        JobKind::Delivery => Places::Deliveries(vec![place]),
        JobKind::Pickup => Places::Pickups(vec![place]),
    };
    Ok(Job {
        id: row.id.clone(),
        places,
    })
}

fn window_bound(row: &JobRow, raw: &str, date: NaiveDate) -> Result<String, BuildError> {
    parse_time_of_day(raw)
        .map(|time| job_timestamp(date, time))
        .ok_or_else(|| BuildError::InvalidTimeOfDay {
            job_id: row.id.clone(),
            value: raw.to_owned(),
        })
}

/// Assemble the complete request.
///
/// The request id is always [`DEFAULT_REQUEST_ID`]; use
/// [`RoutingRequest::with_id`] for a distinct one.
///
/// # Errors
///
/// Returns the first [`BuildError`] raised by parameter validation or by any
/// of the per-part builders.
pub fn build_request(
    jobs: &[JobRow],
    fleet: &FleetRow,
    params: &PlanParameters,
) -> Result<RoutingRequest, BuildError> {
    params.validate()?;
    let shift = build_shift_window(params.date, params.shift.start, params.shift.end, fleet)?;
    let vehicle = build_vehicle_type(
        params.profile,
        &params.costs,
        params.capacity,
        params.amount,
        shift,
    )?;
    let jobs = jobs
        .iter()
        .map(|row| build_job(row, params.date))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!(
        "built routing request with {} jobs for {} profile",
        jobs.len(),
        params.profile
    );
    Ok(RoutingRequest {
        id: DEFAULT_REQUEST_ID.to_owned(),
        fleet: Fleet {
            types: vec![vehicle],
            profiles: vec![params.profile.descriptor()],
        },
        plan: Plan { jobs },
    })
}
