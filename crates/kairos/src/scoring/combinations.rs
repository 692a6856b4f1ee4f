//! Combinations group: ruler-to-ruler link, benefics in the topic house and
//! malefics in the topic house or the first house.
//!
//! Malefic penalties are waived for a malefic that rules the natal Ascendant
//! sign. Without a natal Ascendant nothing is waived.

use crate::aspects::any_aspect_mask;
use crate::ephemeris::Body;
use crate::houses::in_house_mask;
use crate::scoring::context::{short_body, ScoringContext};
use crate::scoring::{RuleResult, ScoreComponent, ScoreGroup};
use crate::western::rulers::ruler_of;

const GROUP: ScoreGroup = ScoreGroup::Combinations;

const MALEFICS: [Body; 2] = [Body::Saturn, Body::Mars];

pub fn rules(ctx: &ScoringContext<'_>) -> Vec<RuleResult> {
    let cfg = &ctx.config.combinations;
    let mut out = vec![rulers_aspect(ctx)];

    for &body in &cfg.topic_benefics {
        let name = format!("comb_pos_{}_topic", short_body(body));
        out.push(in_house(ctx, name, body, ctx.topic_house, cfg.topic_benefic_points));
    }

    let natal_asc_ruler = ctx
        .natal
        .and_then(|n| n.ascendant_sign())
        .map(ruler_of);
    for malefic in MALEFICS {
        if natal_asc_ruler == Some(malefic) {
            log::debug!("Skipping {} penalties: it rules the natal Ascendant", malefic);
            continue;
        }
        out.push(in_house(
            ctx,
            format!("comb_neg_{}_topic", malefic.name()),
            malefic,
            ctx.topic_house,
            cfg.malefic_points,
        ));
        out.push(in_house(
            ctx,
            format!("comb_neg_{}_asc", malefic.name()),
            malefic,
            1,
            cfg.malefic_points,
        ));
    }
    out
}

fn rulers_aspect(ctx: &ScoringContext<'_>) -> RuleResult {
    let name = "comb_pos_rulers_aspect";
    ctx.check_len(name, ctx.asc_ruler.len())?;
    ctx.check_len(name, ctx.topic_ruler.len())?;
    let cfg = &ctx.config.combinations;
    let mask = any_aspect_mask(
        &ctx.asc_ruler.longitudes,
        &ctx.topic_ruler.longitudes,
        &cfg.orbs.pairs(),
    );
    Ok(ScoreComponent::from_mask(name, GROUP, &mask, cfg.rulers_aspect_points))
}

fn in_house(ctx: &ScoringContext<'_>, name: String, body: Body, house: u8, points: f64) -> RuleResult {
    let lons = ctx.longitudes(&name, body)?;
    ctx.check_len(&name, ctx.houses.len())?;
    let mask = in_house_mask(lons, ctx.houses.cusps(), house);
    Ok(ScoreComponent::from_mask(name, GROUP, &mask, points))
}
