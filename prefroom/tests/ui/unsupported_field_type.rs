use prefroom::PreferenceEntity;

#[derive(Default, PreferenceEntity)]
pub struct Broken {
    mood: char,
}

fn main() {
    let broken = Broken::default();
    let _ = broken.mood;
}
