use prefroom::PreferenceEntity;

#[derive(Default, PreferenceEntity)]
pub struct Settings {
    #[preference(encrypted)]
    token: String,
}

fn main() {
    let settings = Settings::default();
    let _ = settings.token;
}
