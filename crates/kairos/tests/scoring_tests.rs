use kairos::aspects::gather_ruler;
use kairos::config::ScoringConfig;
use kairos::ephemeris::{Body, BodyTrack, PositionBatch};
use kairos::houses::{HouseBatch, HouseFrame};
use kairos::natal::{NatalPoint, NatalReference};
use kairos::scoring::{score_batch, ScoreGroup, ScoringContext};
use std::collections::BTreeMap;

fn track(lons: &[f64], speed: f64) -> BodyTrack {
    BodyTrack::from_rows(lons.iter().map(|&l| [l, 0.0, 1.0, speed, 0.0, 0.0]).collect())
}

fn equal_frame(asc: f64) -> HouseFrame {
    HouseFrame {
        cusps: std::array::from_fn(|i| (asc + 30.0 * i as f64).rem_euclid(360.0)),
        ascendant: asc,
        midheaven: (asc + 270.0).rem_euclid(360.0),
    }
}

/// Seven traditional bodies with every longitude array of length `n`.
fn positions(n: usize, overrides: &[(Body, Vec<f64>, f64)]) -> PositionBatch {
    let defaults = [
        (Body::Sun, 300.0, 1.0),
        (Body::Moon, 10.0, 13.0),
        (Body::Mercury, 280.0, 1.3),
        (Body::Venus, 250.0, 1.1),
        (Body::Mars, 160.0, 0.6),
        (Body::Jupiter, 200.0, 0.1),
        (Body::Saturn, 225.0, 0.05),
    ];
    let mut batch = PositionBatch::new(n);
    for (body, lon, speed) in defaults {
        let t = match overrides.iter().find(|(b, _, _)| *b == body) {
            Some((_, lons, s)) => track(lons, *s),
            None => track(&vec![lon; n], speed),
        };
        batch.insert(body, t).unwrap();
    }
    batch
}

struct Fixture {
    positions: PositionBatch,
    houses: HouseBatch,
    config: ScoringConfig,
}

impl Fixture {
    fn new(positions: PositionBatch, asc: f64) -> Self {
        let n = positions.len();
        Self {
            positions,
            houses: HouseBatch::from_frames(&vec![equal_frame(asc); n], vec![false; n]),
            config: ScoringConfig::default(),
        }
    }

    fn board(&self, natal: Option<&NatalReference>) -> kairos::scoring::ScoreBoard {
        let asc_ruler = gather_ruler(&self.houses.ascendants(), &self.positions).unwrap();
        let topic_ruler = gather_ruler(&self.houses.cusp_column(10), &self.positions).unwrap();
        let ctx = ScoringContext {
            positions: &self.positions,
            houses: &self.houses,
            asc_ruler: &asc_ruler,
            topic_ruler: &topic_ruler,
            topic_house: 10,
            natal,
            config: &self.config,
        };
        score_batch(&ctx)
    }
}

#[test]
fn test_moon_conjunct_venus_orb_boundary() {
    let fx = Fixture::new(
        positions(
            3,
            &[
                (Body::Moon, vec![100.0, 100.0, 100.0], 13.0),
                (Body::Venus, vec![100.0, 108.0, 108.01], 1.1),
            ],
        ),
        0.0,
    );
    let board = fx.board(None);
    let conj = board.component("moon_conj_venus").unwrap();
    assert_eq!(conj.group, ScoreGroup::Moon);
    assert_eq!(conj.values, vec![1.0, 1.0, 0.0]);
    assert!(board.failures().is_empty());
}

#[test]
fn test_moon_sign_and_waxing() {
    // Sun 300: Moon at 40 (Taurus) is waxing, Moon at 250 is waning
    let fx = Fixture::new(
        positions(2, &[(Body::Moon, vec![40.0, 250.0], 13.0)]),
        0.0,
    );
    let board = fx.board(None);
    assert_eq!(board.component("moon_taurus").unwrap().values, vec![1.0, 0.0]);
    assert_eq!(board.component("moon_cancer").unwrap().values, vec![0.0, 0.0]);
    assert_eq!(board.component("moon_waxing").unwrap().values, vec![1.0, 0.0]);
}

#[test]
fn test_ruler_dispatch_follows_ascendant_sign() {
    // Asc in Aries (Mars rules) then Libra (Venus rules)
    let asc = [15.0, 195.0];
    let positions = positions(
        2,
        &[
            (Body::Mars, vec![10.0, 10.0], 0.6),
            (Body::Venus, vec![100.0, 100.0], -0.4),
        ],
    );
    let houses = HouseBatch::from_frames(&[equal_frame(asc[0]), equal_frame(asc[1])], vec![false; 2]);
    let fx = Fixture {
        positions,
        houses,
        config: ScoringConfig::default(),
    };
    let board = fx.board(None);

    // Mars in Aries: domicile, direct. Venus in Cancer: neither, retrograde.
    assert_eq!(board.component("ruler_asc_domicile").unwrap().values, vec![1.0, 0.0]);
    assert_eq!(board.component("ruler_asc_direct").unwrap().values, vec![1.0, 0.0]);
    // Venus at Cancer 10: water triplicity and its own term
    assert_eq!(board.component("ruler_asc_triplicity").unwrap().values, vec![0.0, 0.5]);
    assert_eq!(board.component("ruler_asc_term").unwrap().values, vec![0.0, 0.5]);
}

#[test]
fn test_natal_group_empty_without_reference() {
    let fx = Fixture::new(positions(2, &[]), 0.0);
    let board = fx.board(None);
    assert_eq!(board.group_total(ScoreGroup::Natal), vec![0.0, 0.0]);
    assert!(board.components().iter().all(|c| c.group != ScoreGroup::Natal));
}

#[test]
fn test_natal_asc_conjunctions() {
    let mut points = BTreeMap::new();
    points.insert(NatalPoint::Body(Body::Saturn), 3.0);
    points.insert(NatalPoint::Body(Body::Jupiter), 120.0);
    points.insert(NatalPoint::Body(Body::Sun), 0.0);
    points.insert(NatalPoint::Ascendant, 90.0);
    let natal = NatalReference::new(points, None).unwrap();

    let fx = Fixture::new(positions(1, &[]), 0.0);
    let board = fx.board(Some(&natal));

    // transiting Asc 0: conjunct natal Saturn and Sun, trine natal Jupiter, square natal Asc
    assert_eq!(board.component("natal_asc_conj_sat").unwrap().values, vec![-2.0]);
    assert_eq!(board.component("natal_asc_sun").unwrap().values, vec![2.0]);
    assert_eq!(board.component("natal_asc_jup").unwrap().values, vec![1.0]);
    assert_eq!(board.component("natal_asc_asc").unwrap().values, vec![0.0]);
    assert_eq!(board.group_total(ScoreGroup::Natal), vec![1.0]);
}

#[test]
fn test_malefic_penalty_waived_for_natal_asc_ruler() {
    // Saturn in the first house (Asc 0, Saturn at 10)
    let positions = positions(1, &[(Body::Saturn, vec![10.0], 0.05)]);
    let fx = Fixture::new(positions, 0.0);

    let without = fx.board(None);
    assert_eq!(without.component("comb_neg_saturn_asc").unwrap().values, vec![-1.0]);

    // natal Asc in Capricorn: Saturn rules it
    let mut points = BTreeMap::new();
    points.insert(NatalPoint::Ascendant, 280.0);
    let natal = NatalReference::new(points, None).unwrap();
    let with = fx.board(Some(&natal));
    assert!(with.component("comb_neg_saturn_asc").is_none());
    assert!(with.component("comb_neg_mars_asc").is_some());
}

#[test]
fn test_missing_body_zero_fills_only_its_rules() {
    let mut batch = PositionBatch::new(1);
    for body in [Body::Sun, Body::Moon, Body::Mercury, Body::Mars, Body::Saturn, Body::Venus] {
        batch.insert(body, track(&[40.0], 1.0)).unwrap();
    }
    let fx = Fixture::new(batch, 0.0);
    let board = fx.board(None);

    assert!(board.component("moon_conj_jupiter").is_none());
    assert!(board
        .failures()
        .iter()
        .any(|e| e.to_string().contains("moon_conj_jupiter")));
    assert!(board.component("moon_waxing").is_some());
}

fn natal_asc_only(lon: f64) -> NatalReference {
    let mut points = BTreeMap::new();
    points.insert(NatalPoint::Ascendant, lon);
    NatalReference::new(points, None).unwrap()
}

#[test]
fn test_mars_penalty_waived_for_aries_and_scorpio_natal_asc() {
    let fx = Fixture::new(positions(1, &[(Body::Mars, vec![10.0], 0.6)]), 0.0);
    assert_eq!(fx.board(None).component("comb_neg_mars_asc").unwrap().values, vec![-1.0]);

    for natal_asc in [10.0, 220.0] {
        let board = fx.board(Some(&natal_asc_only(natal_asc)));
        assert!(board.component("comb_neg_mars_asc").is_none());
        assert!(board.component("comb_neg_mars_topic").is_none());
        assert!(board.component("comb_neg_saturn_asc").is_some());
    }
}

#[test]
fn test_moon_favorable_house() {
    // Asc 0: Moon at 10 is in the first house, at 275 in the tenth
    let fx = Fixture::new(positions(2, &[(Body::Moon, vec![10.0, 275.0], 13.0)]), 0.0);
    let board = fx.board(None);
    assert_eq!(board.component("moon_favorable_house").unwrap().values, vec![0.0, 1.0]);
}

#[test]
fn test_moon_aspect_to_ascendant_ruler() {
    // Asc in Aries: Mars at 160 rules it
    let fx = Fixture::new(positions(2, &[(Body::Moon, vec![10.0, 160.0], 13.0)]), 0.0);
    let board = fx.board(None);
    assert_eq!(board.component("moon_aspect_ruler_asc").unwrap().values, vec![0.0, 2.0]);
}

#[test]
fn test_rulers_in_aspect() {
    // Mars rules the Asc (Aries), Saturn at 225 rules the tenth (Capricorn)
    let fx = Fixture::new(positions(2, &[(Body::Mars, vec![160.0, 140.0], 0.6)]), 0.0);
    let board = fx.board(None);
    let rulers = board.component("comb_pos_rulers_aspect").unwrap();
    assert_eq!(rulers.group, ScoreGroup::Combinations);
    // 65 degrees is a sextile within 6, 85 is nothing
    assert_eq!(rulers.values, vec![2.0, 0.0]);
}

#[test]
fn test_topic_house_benefics() {
    // tenth house runs 270..300
    let fx = Fixture::new(
        positions(
            2,
            &[
                (Body::Sun, vec![300.0, 285.0], 1.0),
                (Body::Jupiter, vec![200.0, 280.0], 0.1),
                (Body::Moon, vec![10.0, 290.0], 13.0),
            ],
        ),
        0.0,
    );
    let board = fx.board(None);
    for name in ["comb_pos_sun_topic", "comb_pos_jup_topic", "comb_pos_moon_topic"] {
        assert_eq!(board.component(name).unwrap().values, vec![0.0, 2.0], "{}", name);
    }
}

#[test]
fn test_natal_mc_conjunction() {
    // Asc 0 puts the MC at 270
    let mut points = BTreeMap::new();
    points.insert(NatalPoint::Body(Body::Venus), 272.0);
    let natal = NatalReference::new(points, None).unwrap();
    let fx = Fixture::new(positions(1, &[]), 0.0);
    let board = fx.board(Some(&natal));
    assert_eq!(board.component("natal_mc_conj_ven").unwrap().values, vec![1.0]);
    assert_eq!(board.component("natal_asc_ven").unwrap().values, vec![0.0]);
}

#[test]
fn test_natal_sixth_house_penalty() {
    // natal equal houses from 90: the sixth runs 240..270
    let mut points = BTreeMap::new();
    points.insert(NatalPoint::Ascendant, 90.0);
    let cusps = std::array::from_fn(|i| (90.0 + 30.0 * i as f64).rem_euclid(360.0));
    let natal = NatalReference::new(points, Some(cusps)).unwrap();

    let asc = [250.0, 100.0];
    let houses = HouseBatch::from_frames(&[equal_frame(asc[0]), equal_frame(asc[1])], vec![false; 2]);
    let fx = Fixture {
        positions: positions(2, &[]),
        houses,
        config: ScoringConfig::default(),
    };
    let board = fx.board(Some(&natal));
    assert_eq!(board.component("natal_asc_house_6").unwrap().values, vec![-2.0, 0.0]);
    assert!(fx.board(Some(&natal_asc_only(90.0))).component("natal_asc_house_6").is_none());
}
