//! Natal group: how the elected angles sit on the reference chart.
//!
//! Empty when no natal reference is supplied. A natal point missing from the
//! reference simply produces no component.

use crate::aspects::{exact_aspect_mask_to, Aspect};
use crate::config::AspectPoints;
use crate::houses::HouseBatch;
use crate::natal::{natal_house_mask, NatalReference};
use crate::scoring::context::{short_body, ScoringContext};
use crate::scoring::{RuleResult, ScoreComponent, ScoreGroup};

const GROUP: ScoreGroup = ScoreGroup::Natal;

pub fn rules(ctx: &ScoringContext<'_>) -> Vec<RuleResult> {
    let Some(natal) = ctx.natal else {
        return Vec::new();
    };
    if let Err(e) = ctx.check_len("natal", ctx.houses.len()) {
        return vec![Err(e)];
    }
    let cfg = &ctx.config.natal;
    let asc = ctx.houses.ascendants();
    let mc = ctx.houses.midheavens();
    let mut out = Vec::new();

    for &malefic in &cfg.asc_malefics {
        if let Some(lon) = natal.body(malefic) {
            let mask = exact_aspect_mask_to(&asc, lon, 0.0, cfg.orb);
            out.push(Ok(ScoreComponent::from_mask(
                format!("natal_asc_conj_{}", short_body(malefic)),
                GROUP,
                &mask,
                cfg.asc_malefic_points,
            )));
        }
    }

    for &support in &cfg.asc_supports {
        if let Some(lon) = natal.body(support) {
            out.push(Ok(asc_aspects(
                format!("natal_asc_{}", short_body(support)),
                &asc,
                lon,
                cfg.orb,
                cfg.asc_support_points,
            )));
        }
    }
    if let Some(lon) = natal.ascendant() {
        out.push(Ok(asc_aspects(
            "natal_asc_asc".to_string(),
            &asc,
            lon,
            cfg.orb,
            cfg.asc_natal_asc_points,
        )));
    }

    for &support in &cfg.mc_supports {
        if let Some(lon) = natal.body(support) {
            let mask = exact_aspect_mask_to(&mc, lon, 0.0, cfg.orb);
            out.push(Ok(ScoreComponent::from_mask(
                format!("natal_mc_conj_{}", short_body(support)),
                GROUP,
                &mask,
                cfg.mc_conjunction_points,
            )));
        }
    }

    if let Some(component) = asc_house_penalty(ctx.houses, natal, cfg.penalized_house, cfg.house_points) {
        out.push(Ok(component));
    }
    out
}

fn asc_aspects(name: String, asc: &[f64], natal_lon: f64, orb: f64, points: AspectPoints) -> ScoreComponent {
    let masks = [
        (Aspect::Conjunction, points.conjunction),
        (Aspect::Trine, points.trine),
        (Aspect::Sextile, points.sextile),
    ]
    .map(|(aspect, pts)| (exact_aspect_mask_to(asc, natal_lon, aspect.angle(), orb), pts));
    ScoreComponent::from_masks(name, GROUP, asc.len(), &masks)
}

fn asc_house_penalty(
    houses: &HouseBatch,
    natal: &NatalReference,
    house: u8,
    points: f64,
) -> Option<ScoreComponent> {
    natal.cusps()?;
    let mask = natal_house_mask(&houses.ascendants(), natal, &[house]);
    Some(ScoreComponent::from_mask(
        format!("natal_asc_house_{}", house),
        GROUP,
        &mask,
        points,
    ))
}
