use crate::{
    cli::EstimateArgs,
    core::{
        consumption::ShavingReport,
        series,
        session::{EstimateOutcome, OrientationResult, Session},
    },
    prelude::*,
    quantity::power::Kilowatts,
    report::Summary,
    tables::{
        ProfileColumn,
        build_monthly_table,
        build_profile_table,
        build_self_consumption_table,
        build_summary_table,
        solstice_days,
    },
};

#[instrument(skip_all)]
pub async fn estimate(args: &EstimateArgs) -> Result {
    let site = args.site.to_parameters();
    site.validate()?;
    let pair = args.comparison.to_pair(site.azimuth);
    let provider = args.source.try_new_source()?;

    let mut session = Session::default();
    let token = session.begin();

    // Sequential on purpose: the comparison fetch only starts once the
    // primary one has completed.
    let primary =
        OrientationResult::new(site.azimuth, provider.fetch_hourly(&site).await?);
    ensure!(!primary.daily.is_empty(), "no production data received");
    info!(azimuth = %primary.azimuth, n_days = primary.daily.len(), "estimated");

    let secondary = match &pair {
        Some(pair) => {
            let secondary_site = site.with_azimuth(pair.secondary());
            secondary_site.validate()?;
            let result = OrientationResult::new(
                pair.secondary(),
                provider.fetch_hourly(&secondary_site).await?,
            );
            ensure!(!result.daily.is_empty(), "no production data received for the second azimuth");
            info!(azimuth = %result.azimuth, n_days = result.daily.len(), "estimated");
            Some(result)
        }
        None => None,
    };

    ensure!(
        session.complete(token, EstimateOutcome { primary, secondary }),
        "the estimate was superseded by a newer request",
    );
    let outcome = session.current().context("no estimate available")?;

    println!("{}", build_summary_table(&Summary::from_outcome(outcome)?, outcome));
    println!("{}", build_monthly_table(outcome));

    if let Some(month) = args.report.month {
        println!("{}", build_profile_table(&month_profile_columns(outcome, month)));
    }
    if let Some(day) = args.report.day {
        println!("{}", build_profile_table(&day_profile_columns(outcome, day)));
    }
    if let Some(load) = args.report.consumption
        && load > Kilowatts::ZERO
    {
        let hourly = match &outcome.secondary {
            Some(secondary) => series::merge_hourly(&outcome.primary.hourly, &secondary.hourly),
            None => outcome.primary.hourly.clone(),
        };
        println!("{}", build_self_consumption_table(&ShavingReport::estimate(&hourly, load)));
    }

    Ok(())
}

fn month_profile_columns(outcome: &EstimateOutcome, month: u32) -> Vec<ProfileColumn> {
    let primary = series::month_average_profile(&outcome.primary.hourly, month);
    let mut columns = vec![ProfileColumn {
        label: format!("Azimuth {} (month {month})", outcome.primary.azimuth),
        profile: primary,
    }];
    if let Some(secondary) = &outcome.secondary {
        let secondary_profile = series::month_average_profile(&secondary.hourly, month);
        columns.push(ProfileColumn {
            label: format!("Azimuth {} (month {month})", secondary.azimuth),
            profile: secondary_profile,
        });
        columns.push(ProfileColumn {
            label: "Sum".to_owned(),
            profile: primary.sum(&secondary_profile),
        });
    }
    columns
}

fn day_profile_columns(outcome: &EstimateOutcome, day: chrono::NaiveDate) -> Vec<ProfileColumn> {
    let primary = series::day_profile(&outcome.primary.hourly, day);
    let mut columns = vec![ProfileColumn {
        label: format!("Azimuth {} ({day})", outcome.primary.azimuth),
        profile: primary,
    }];
    match &outcome.secondary {
        Some(secondary) => {
            let secondary_profile = series::day_profile(&secondary.hourly, day);
            columns.push(ProfileColumn {
                label: format!("Azimuth {} ({day})", secondary.azimuth),
                profile: secondary_profile,
            });
            columns.push(ProfileColumn {
                label: "Sum".to_owned(),
                profile: primary.sum(&secondary_profile),
            });
        }
        None => {
            // Single orientation: frame the day with the solstice envelope.
            let (summer, winter) = solstice_days();
            columns.push(ProfileColumn {
                label: format!("Summer envelope ({summer})"),
                profile: series::day_profile(&outcome.primary.hourly, summer),
            });
            columns.push(ProfileColumn {
                label: format!("Winter envelope ({winter})"),
                profile: series::day_profile(&outcome.primary.hourly, winter),
            });
        }
    }
    columns
}
