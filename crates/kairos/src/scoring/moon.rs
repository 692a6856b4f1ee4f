//! Moon group: sign, phase, aspects, house and links to the two rulers.

use crate::aspects::{exact_aspect_mask, waxing_mask, Aspect};
use crate::ephemeris::Body;
use crate::houses::in_houses_mask;
use crate::scoring::context::{RulerRole, ScoringContext};
use crate::scoring::{RuleResult, ScoreComponent, ScoreGroup};
use crate::western::signs::{sign_mask, Sign};

const GROUP: ScoreGroup = ScoreGroup::Moon;

pub fn rules(ctx: &ScoringContext<'_>) -> Vec<RuleResult> {
    let cfg = &ctx.config.moon;
    let mut out = Vec::new();

    for &sign in &cfg.favorable_signs {
        out.push(moon_in_sign(ctx, sign));
    }
    out.push(waxing(ctx));

    let orbs = cfg.orbs;
    for &benefic in &cfg.benefics {
        for (aspect, orb) in [
            (Aspect::Trine, orbs.trine),
            (Aspect::Sextile, orbs.sextile),
            (Aspect::Conjunction, orbs.conjunction),
        ] {
            out.push(aspect_to(ctx, benefic, aspect, orb, cfg.benefic_aspect_points));
        }
    }
    for (aspect, orb) in [(Aspect::Trine, orbs.trine), (Aspect::Sextile, orbs.sextile)] {
        out.push(aspect_to(ctx, Body::Sun, aspect, orb, cfg.sun_aspect_points));
    }

    out.push(favorable_house(ctx));
    out.push(aspect_to_ruler(ctx, RulerRole::Ascendant));
    out.push(aspect_to_ruler(ctx, RulerRole::Topic));
    out
}

fn moon_in_sign(ctx: &ScoringContext<'_>, sign: Sign) -> RuleResult {
    let name = format!("moon_{}", sign.name());
    let moon = ctx.longitudes(&name, Body::Moon)?;
    let mask = sign_mask(moon, &[sign]);
    Ok(ScoreComponent::from_mask(name, GROUP, &mask, ctx.config.moon.sign_points))
}

fn waxing(ctx: &ScoringContext<'_>) -> RuleResult {
    let name = "moon_waxing";
    let moon = ctx.longitudes(name, Body::Moon)?;
    let sun = ctx.longitudes(name, Body::Sun)?;
    Ok(ScoreComponent::from_mask(
        name,
        GROUP,
        &waxing_mask(sun, moon),
        ctx.config.moon.waxing_points,
    ))
}

fn aspect_to(ctx: &ScoringContext<'_>, body: Body, aspect: Aspect, orb: f64, points: f64) -> RuleResult {
    let name = format!("moon_{}_{}", aspect.short_name(), body.name());
    let moon = ctx.longitudes(&name, Body::Moon)?;
    let other = ctx.longitudes(&name, body)?;
    let mask = exact_aspect_mask(moon, other, aspect.angle(), orb);
    Ok(ScoreComponent::from_mask(name, GROUP, &mask, points))
}

fn favorable_house(ctx: &ScoringContext<'_>) -> RuleResult {
    let name = "moon_favorable_house";
    let moon = ctx.longitudes(name, Body::Moon)?;
    ctx.check_len(name, ctx.houses.len())?;
    let mask = in_houses_mask(moon, ctx.houses.cusps(), &ctx.config.moon.favorable_houses);
    Ok(ScoreComponent::from_mask(name, GROUP, &mask, ctx.config.moon.house_points))
}

fn aspect_to_ruler(ctx: &ScoringContext<'_>, role: RulerRole) -> RuleResult {
    let name = match role {
        RulerRole::Ascendant => "moon_aspect_ruler_asc",
        RulerRole::Topic => "moon_aspect_ruler_topic",
    };
    let moon = ctx.longitudes(name, Body::Moon)?;
    let ruler = ctx.ruler(role);
    ctx.check_len(name, ruler.len())?;
    let points = ctx.config.moon.ruler_aspect_points;
    let masks: Vec<(Vec<bool>, f64)> = ctx
        .config
        .moon
        .orbs
        .pairs()
        .iter()
        .map(|&(aspect, orb)| {
            (
                exact_aspect_mask(moon, &ruler.longitudes, aspect.angle(), orb),
                points,
            )
        })
        .collect();
    Ok(ScoreComponent::from_masks(name, GROUP, ctx.len(), &masks))
}
