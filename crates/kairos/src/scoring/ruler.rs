//! Ruler group, applied to the Ascendant ruler and the topic-house ruler.
//!
//! The ruler changes per instant, so every check here runs on the gathered
//! [`RulerTrack`](crate::aspects::RulerTrack) rather than on a fixed body.

use crate::aspects::{any_aspect_mask, separations};
use crate::ephemeris::Body;
use crate::houses::in_houses_mask;
use crate::scoring::context::{RulerRole, ScoringContext};
use crate::scoring::{RuleResult, ScoreComponent, ScoreGroup};
use crate::western::dignities::{
    domicile_mask_for, exaltation_mask_for, term_mask_for, triplicity_mask_for,
};

fn group(role: RulerRole) -> ScoreGroup {
    match role {
        RulerRole::Ascendant => ScoreGroup::RulerAsc,
        RulerRole::Topic => ScoreGroup::RulerTopic,
    }
}

pub fn rules(ctx: &ScoringContext<'_>, role: RulerRole) -> Vec<RuleResult> {
    let cfg = &ctx.config.ruler;
    let ruler = ctx.ruler(role);
    let prefix = role.prefix();
    let g = group(role);

    let dignity = |suffix: &str, f: fn(&[Body], &[f64]) -> Vec<bool>, points: f64| -> RuleResult {
        let name = format!("{}_{}", prefix, suffix);
        ctx.check_len(&name, ruler.len())?;
        let mask = f(&ruler.ids, &ruler.longitudes);
        Ok(ScoreComponent::from_mask(name, g, &mask, points))
    };

    let mut out = vec![
        dignity("domicile", domicile_mask_for, cfg.domicile_points),
        dignity("exaltation", exaltation_mask_for, cfg.exaltation_points),
        dignity("triplicity", triplicity_mask_for, cfg.triplicity_points),
        dignity("term", term_mask_for, cfg.term_points),
        direct(ctx, role),
        not_combust(ctx, role),
        favorable_house(ctx, role),
    ];
    for &benefic in &cfg.benefics {
        out.push(aspect_benefic(ctx, role, benefic));
    }
    out
}

fn direct(ctx: &ScoringContext<'_>, role: RulerRole) -> RuleResult {
    let name = format!("{}_direct", role.prefix());
    let ruler = ctx.ruler(role);
    ctx.check_len(&name, ruler.len())?;
    let mask: Vec<bool> = ruler.speeds.iter().map(|&s| s > 0.0).collect();
    Ok(ScoreComponent::from_mask(name, group(role), &mask, ctx.config.ruler.direct_points))
}

fn not_combust(ctx: &ScoringContext<'_>, role: RulerRole) -> RuleResult {
    let name = format!("{}_not_combust", role.prefix());
    let ruler = ctx.ruler(role);
    ctx.check_len(&name, ruler.len())?;
    let sun = ctx.longitudes(&name, Body::Sun)?;
    let orb = ctx.config.ruler.combust_orb;
    let mask: Vec<bool> = separations(&ruler.longitudes, sun)
        .into_iter()
        .map(|d| d > orb)
        .collect();
    Ok(ScoreComponent::from_mask(
        name,
        group(role),
        &mask,
        ctx.config.ruler.not_combust_points,
    ))
}

fn favorable_house(ctx: &ScoringContext<'_>, role: RulerRole) -> RuleResult {
    let name = format!("{}_fav_house", role.prefix());
    let ruler = ctx.ruler(role);
    ctx.check_len(&name, ruler.len())?;
    ctx.check_len(&name, ctx.houses.len())?;
    let cfg = &ctx.config.ruler;
    let mask = in_houses_mask(&ruler.longitudes, ctx.houses.cusps(), &cfg.favorable_houses);
    Ok(ScoreComponent::from_mask(name, group(role), &mask, cfg.house_points))
}

fn aspect_benefic(ctx: &ScoringContext<'_>, role: RulerRole, benefic: Body) -> RuleResult {
    let name = format!("{}_aspect_{}", role.prefix(), benefic.name());
    let ruler = ctx.ruler(role);
    ctx.check_len(&name, ruler.len())?;
    let target = ctx.longitudes(&name, benefic)?;
    let cfg = &ctx.config.ruler;
    let masks: Vec<(Vec<bool>, f64)> = cfg
        .orbs
        .pairs()
        .iter()
        .map(|&pair| {
            (
                any_aspect_mask(&ruler.longitudes, target, &[pair]),
                cfg.benefic_aspect_points,
            )
        })
        .collect();
    Ok(ScoreComponent::from_masks(name, group(role), ctx.len(), &masks))
}
