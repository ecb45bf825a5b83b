use std::fmt;
use std::str::FromStr;

use crate::error::SizeError;

/// The classifier families a model artifact can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Algorithm {
    RandomForest,
    Knn,
    DecisionTree,
    LogisticRegression,
    Svm,
}

impl Algorithm {
    /// All algorithms in menu order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::RandomForest,
        Algorithm::Knn,
        Algorithm::DecisionTree,
        Algorithm::LogisticRegression,
        Algorithm::Svm,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::RandomForest => "Random Forest",
            Algorithm::Knn => "KNN",
            Algorithm::DecisionTree => "Decision Tree",
            Algorithm::LogisticRegression => "Logistic Regression",
            Algorithm::Svm => "SVM",
        }
    }

    /// Lowercase, underscore-joined display name. Used for artifact file
    /// names and stats bundle keys.
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::RandomForest => "random_forest",
            Algorithm::Knn => "knn",
            Algorithm::DecisionTree => "decision_tree",
            Algorithm::LogisticRegression => "logistic_regression",
            Algorithm::Svm => "svm",
        }
    }

    /// Position in [`Algorithm::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Algorithm {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.key() == key)
            .ok_or_else(|| SizeError::UnknownAlgorithm(s.to_string()))
    }
}

/// Title-case a stats bundle key for display (`random_forest` -> `Random Forest`).
pub fn title_case_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_derive_from_display_names() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.key(), alg.display_name().to_lowercase().replace(' ', "_"));
        }
    }

    #[test]
    fn parses_keys_and_display_names() {
        assert_eq!("knn".parse::<Algorithm>().unwrap(), Algorithm::Knn);
        assert_eq!("KNN".parse::<Algorithm>().unwrap(), Algorithm::Knn);
        assert_eq!(
            "Logistic Regression".parse::<Algorithm>().unwrap(),
            Algorithm::LogisticRegression
        );
        assert_eq!(
            "random-forest".parse::<Algorithm>().unwrap(),
            Algorithm::RandomForest
        );
        assert!(matches!(
            "naive_bayes".parse::<Algorithm>(),
            Err(SizeError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn index_matches_menu_order() {
        for (i, alg) in Algorithm::ALL.into_iter().enumerate() {
            assert_eq!(alg.index(), i);
        }
    }

    #[test]
    fn title_cases_keys() {
        assert_eq!(title_case_key("random_forest"), "Random Forest");
        assert_eq!(title_case_key("knn"), "Knn");
        assert_eq!(title_case_key("svm"), "Svm");
    }
}
