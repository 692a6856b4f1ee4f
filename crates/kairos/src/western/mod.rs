pub mod dignities;
pub mod rulers;
pub mod signs;

pub use dignities::{
    debility_mask, debility_mask_for, dignity_mask, dignity_of, domicile_mask_for, exaltation_mask_for,
    term_mask_for, triplicity_mask_for, DignityType,
};
pub use rulers::{
    detriments_of, exaltation_of, exalted_in, fall_of, ruler_of, signs_ruled_by, term_ruler,
    triplicity_rulers,
};
pub use signs::{sign_index, sign_indices, sign_mask, Element, Sign};
