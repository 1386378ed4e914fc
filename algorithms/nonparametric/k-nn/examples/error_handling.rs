//! Example demonstrating error handling with the k-NN classifier.
//!
//! Every failure the classifier can report is a `KnnError` value returned
//! through `Result`; none of them panic.

use churn_helpers::{Dataset, L2Dist, Label};
use k_nn::{KnnClassifier, KnnError};
use ndarray::{Array2, array};

fn table(features: Array2<f64>, labels: Vec<Label>) -> Dataset<f64> {
    match Dataset::from_parts(features, labels) {
        Ok(data) => data,
        Err(e) => panic!("example data is well-formed: {e}"),
    }
}

fn main() {
    println!("k-NN Classifier Error Handling Examples");
    println!("=======================================");

    // Example 1: Handle invalid k value
    println!("\n1. Handling invalid k value (k=0):");
    let training = table(
        array![[1.0, 1.0], [2.0, 2.0]],
        vec![Label::Negative, Label::Negative],
    );

    match KnnClassifier::new(0, training.clone(), L2Dist) {
        Ok(_) => println!("   Classifier created successfully"),
        Err(KnnError::InvalidK) => println!("   ✓ Caught expected error: {}", KnnError::InvalidK),
        Err(e) => println!("   ✗ Unexpected error: {}", e),
    }

    // Example 2: Query with the wrong number of features
    println!("\n2. Handling a query from a different feature space:");
    match KnnClassifier::new(1, training, L2Dist) {
        Ok(classifier) => match classifier.predict(array![1.0, 1.0, 1.0].view()) {
            Ok(label) => println!("   Predicted label: {}", label),
            Err(e @ KnnError::DimensionMismatch { .. }) => {
                println!("   ✓ Caught expected error: {}", e)
            }
            Err(e) => println!("   ✗ Unexpected error: {}", e),
        },
        Err(e) => println!("   Error creating classifier: {}", e),
    }

    // Example 3: NaN in the training data
    println!("\n3. Handling NaN values in the training data:");
    let poisoned = table(array![[f64::NAN, 0.0]], vec![Label::Positive]);
    match KnnClassifier::new(1, poisoned, L2Dist) {
        Ok(classifier) => match classifier.predict(array![0.0, 0.0].view()) {
            Ok(label) => println!("   Predicted label: {}", label),
            Err(KnnError::InvalidDistance) => {
                println!("   ✓ Caught expected error: {}", KnnError::InvalidDistance)
            }
            Err(e) => println!("   ✗ Unexpected error: {}", e),
        },
        Err(e) => println!("   Error creating classifier: {}", e),
    }

    // Example 4: Demonstrate error propagation in a function
    println!("\n4. Error propagation in functions:");

    fn classify_with_error_handling() -> Result<Label, KnnError> {
        let training = table(array![[1.0], [-1.0]], vec![Label::Positive, Label::Negative]);
        let classifier = KnnClassifier::new(1, training, L2Dist)?;
        classifier.predict(array![0.5].view())
    }

    match classify_with_error_handling() {
        Ok(result) => println!("   ✓ Classification result: {}", result),
        Err(e) => println!("   ✗ Classification failed: {}", e),
    }
}
