use std::path::Path;

use churn_knn::{Dataset, Label, Metrics};

const RULE: &str = "========================================";

pub fn banner(train: &Path, test: &str, k: usize) -> String {
    format!(
        "{RULE}\nk-NN churn prediction\n{RULE}\n\n\
         Training file: {}\n\
         Test file:     {test}\n\
         k (neighbors): {k}\n\n",
        train.display()
    )
}

pub fn table_summary(name: &str, data: &Dataset<f64>) -> String {
    format!(
        "Loaded {name} data:\n  - Samples:  {}\n  - Features: {}\n  - Positive: {}\n\n",
        data.n_samples(),
        data.n_features(),
        data.positives()
    )
}

pub fn metrics(metrics: &Metrics) -> String {
    let c = &metrics.confusion;
    format!(
        "{RULE}\nResults:\n{RULE}\n\
         Accuracy:  {}\n\
         Precision: {}\n\
         Recall:    {}\n\
         F1-score:  {:.4}\n\
         Confusion: TP={} FP={} TN={} FN={}\n\
         {RULE}\n\n",
        percent(metrics.accuracy),
        percent(metrics.precision),
        percent(metrics.recall),
        metrics.f1_score,
        c.true_positives,
        c.false_positives,
        c.true_negatives,
        c.false_negatives
    )
}

pub fn single_prediction(row: usize, predicted: Label, actual: Label) -> String {
    let correct = if predicted == actual { "yes" } else { "no" };
    format!(
        "Single prediction, test row #{row}:\n  Predicted: {predicted}\n  Actual:    {actual}\n  Correct:   {correct}\n"
    )
}

fn percent(value: f64) -> String {
    format!("{:.4} ({:.2}%)", value, value * 100.0)
}
