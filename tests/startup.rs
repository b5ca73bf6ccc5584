use tempfile::TempDir;

use timer_dashboard::{
    initial_screen,
    store::{save_endpoint, save_mode, ConfigKey, FileConfigStore},
    ConfigStore, Configuration, Endpoint, Mode, Screen,
};

#[test]
fn choices_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("client.json");

    {
        let store = FileConfigStore::open(&path).unwrap();
        assert_eq!(initial_screen(&Configuration::load(&store)), Screen::ModeSelection);

        save_mode(&store, Mode::Dashboard).unwrap();
        assert_eq!(initial_screen(&Configuration::load(&store)), Screen::EndpointEntry);

        let endpoint = Endpoint::normalize("192.168.4.1:3000").unwrap();
        save_endpoint(&store, &endpoint).unwrap();
    }

    let store = FileConfigStore::open(&path).unwrap();
    let expected = Endpoint::parse("http://192.168.4.1:3000").unwrap();
    assert_eq!(
        initial_screen(&Configuration::load(&store)),
        Screen::Dashboard(expected)
    );

    save_mode(&store, Mode::Timer).unwrap();
    assert_eq!(initial_screen(&Configuration::load(&store)), Screen::Timer);
    // Switching mode leaves the endpoint alone
    assert_eq!(
        store.get(ConfigKey::ServerEndpoint).as_deref(),
        Some("http://192.168.4.1:3000/")
    );
}

#[test]
fn hand_edited_garbage_falls_back_to_mode_selection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("client.json");
    std::fs::write(&path, r#"{ "lastMode": "stopwatch", "serverEndpoint": "ftp://nope" }"#).unwrap();

    let store = FileConfigStore::open(&path).unwrap();
    let config = Configuration::load(&store);
    assert_eq!(config, Configuration::default());
    assert_eq!(initial_screen(&config), Screen::ModeSelection);
}
