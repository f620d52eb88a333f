use prefroom::PreferenceEntity;

#[derive(Default, PreferenceEntity)]
pub struct Scores {
    score: i32,
    #[preference(key = "Score")]
    best: i32,
}

fn main() {
    let scores = Scores::default();
    let _ = (scores.score, scores.best);
}
