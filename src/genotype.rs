//! Per-sample genotype classification from flattened allele index arrays.

use crate::errors::{HtsViewError, Result};

/// Diploid genotype class for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenotypeCall {
    /// Both alleles reference
    HomRef,
    /// Alleles differ
    Het,
    /// Both alleles the same non-reference allele
    HomAlt,
    /// Uncalled, or non-diploid ploidy
    Missing,
}

impl GenotypeCall {
    /// Lowercase class name, e.g. `"hom_ref"`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HomRef => "hom_ref",
            Self::Het => "het",
            Self::HomAlt => "hom_alt",
            Self::Missing => "missing",
        }
    }
}

impl std::fmt::Display for GenotypeCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies each sample from a flattened allele index array.
///
/// `alleles` holds `ploidy` consecutive allele indices per sample, where a
/// negative index marks an uncalled allele. Ploidy is inferred as
/// `alleles.len() / sample_count`; any ploidy other than 2 yields
/// [`GenotypeCall::Missing`] for every sample rather than guessing at
/// polyploid semantics.
///
/// # Errors
///
/// [`HtsViewError::SampleCountMismatch`] when `sample_count` is zero or does
/// not divide `alleles.len()`.
pub fn classify(alleles: &[i32], sample_count: usize) -> Result<Vec<GenotypeCall>> {
    if sample_count == 0 || alleles.len() % sample_count != 0 {
        return Err(HtsViewError::SampleCountMismatch {
            length: alleles.len(),
            samples: sample_count,
        });
    }
    let ploidy = alleles.len() / sample_count;
    if ploidy != 2 {
        return Ok(vec![GenotypeCall::Missing; sample_count]);
    }
    Ok(alleles
        .chunks_exact(2)
        .map(|pair| classify_diploid(pair[0], pair[1]))
        .collect())
}

fn classify_diploid(a: i32, b: i32) -> GenotypeCall {
    if a < 0 || b < 0 {
        GenotypeCall::Missing
    } else if a == 0 && b == 0 {
        GenotypeCall::HomRef
    } else if a == b {
        GenotypeCall::HomAlt
    } else {
        GenotypeCall::Het
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::errors::HtsViewError;

    #[rstest]
    #[case::hom_ref(0, 0, GenotypeCall::HomRef)]
    #[case::het(0, 1, GenotypeCall::Het)]
    #[case::het_swapped(1, 0, GenotypeCall::Het)]
    #[case::hom_alt(1, 1, GenotypeCall::HomAlt)]
    #[case::hom_alt_second(2, 2, GenotypeCall::HomAlt)]
    #[case::multiallelic_het(1, 2, GenotypeCall::Het)]
    #[case::missing_first(-1, 1, GenotypeCall::Missing)]
    #[case::missing_both(-1, -1, GenotypeCall::Missing)]
    fn test_diploid_classes(#[case] a: i32, #[case] b: i32, #[case] expected: GenotypeCall) {
        assert_eq!(classify(&[a, b], 1).unwrap(), vec![expected]);
    }

    #[test]
    fn test_multiple_samples() {
        let calls = classify(&[0, 0, 0, 1, 2, 2, -1, 0], 4).unwrap();
        assert_eq!(
            calls,
            vec![GenotypeCall::HomRef, GenotypeCall::Het, GenotypeCall::HomAlt, GenotypeCall::Missing]
        );
    }

    #[test]
    fn test_non_diploid_is_all_missing() {
        // haploid
        assert_eq!(classify(&[0, 1, 2], 3).unwrap(), vec![GenotypeCall::Missing; 3]);
        // triploid
        assert_eq!(classify(&[0, 0, 1, 1, 1, 1], 2).unwrap(), vec![GenotypeCall::Missing; 2]);
    }

    #[test]
    fn test_zero_samples_is_an_error() {
        let err = classify(&[0, 1], 0).unwrap_err();
        assert!(matches!(err, HtsViewError::SampleCountMismatch { length: 2, samples: 0 }));
    }

    #[test]
    fn test_indivisible_length_is_an_error() {
        let err = classify(&[0, 1, 0], 2).unwrap_err();
        assert!(matches!(err, HtsViewError::SampleCountMismatch { length: 3, samples: 2 }));
    }

    #[test]
    fn test_empty_alleles_zero_ploidy() {
        // 0 / 2 = ploidy 0, not diploid
        assert_eq!(classify(&[], 2).unwrap(), vec![GenotypeCall::Missing; 2]);
    }
}
