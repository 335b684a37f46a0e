#[cfg(test)]
mod tests {
    use crate::pokemon::*;
    use once_cell::sync::Lazy;
    use rand::SeedableRng;
    use rand_hc::Hc128Rng;

    static PIKACHU: Lazy<Pokemon> = Lazy::new(|| {
        Pokemon::from_json(
            r#"{
                "name": "Pikachu",
                "level": 3,
                "xp": 12,
                "stats": {"HP": 35, "Attack": 55, "Defence": 40, "Sp. Atk": 50, "Sp. Def": 50, "Speed": 90},
                "id": 25,
                "type": ["Electric"]
            }"#,
        )
        .expect("valid record")
    });

    #[test]
    fn stat_table_layout() {
        let expected = "\
Ability      Value
---------  -------
HP              35
Attack          55
Defence         40
Sp. Atk         50
Sp. Def         50
Speed           90";

        assert_eq!(expected, StatTable(&PIKACHU.stats).to_string());
    }

    #[test]
    fn stat_table_widens_for_large_values() {
        let stats = Stats {
            hp: 123_456_789,
            ..Stats::default()
        };
        let table = StatTable(&stats).to_string();
        let mut lines = table.lines();

        assert_eq!(Some("Ability        Value"), lines.next());
        assert_eq!(Some("---------  ---------"), lines.next());
        assert_eq!(Some("HP         123456789"), lines.next());
        assert_eq!(Some("Attack             0"), lines.next());
    }

    #[test]
    fn page_without_nickname() {
        let page = PIKACHU.page(2, 7);

        assert_eq!("Pikachu", page.title);
        assert_eq!("Pokémon ID: 2/7", page.footer);
        assert_eq!(
            Some("https://assets.pokemon.com/assets/cms2/img/pokedex/detail/025.png"),
            page.thumbnail.as_deref()
        );
        assert!(page.description.starts_with("**Level**: 3\n**XP**: 12/75\n```prolog\n"));
        assert!(page.description.ends_with("Speed           90\n```"));
    }

    #[test]
    fn page_with_nickname() {
        let mut pokemon = PIKACHU.clone();
        pokemon.nickname = Some("Sparky".to_string());
        pokemon.id = None;

        let page = pokemon.page(1, 1);
        assert!(page.description.starts_with("**Nickname**: Sparky\n**Level**: 3"));
        assert_eq!(None, page.thumbnail);
    }

    #[test]
    fn zero_catalogue_id_has_no_thumbnail() {
        let mut pokemon = PIKACHU.clone();
        pokemon.id = Some(0);
        assert_eq!(None, pokemon.thumbnail());
    }

    #[test]
    fn unknown_fields_survive_rewrite() {
        let mut pokemon = PIKACHU.clone();
        pokemon.nickname = Some("Volt".to_string());

        let json = pokemon.to_json().expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");

        assert_eq!("Volt", value["nickname"]);
        assert_eq!("Electric", value["type"][0]);
        assert_eq!(90, value["stats"]["Speed"]);
    }

    #[test]
    fn unknown_stats_survive_rewrite() {
        let json = r#"{"name": "Onix", "level": 9, "xp": 3,
            "stats": {"HP": 35, "Attack": 45, "Defence": 160, "Sp. Atk": 30, "Sp. Def": 45, "Speed": 70, "Accuracy": 100}}"#;
        let pokemon = Pokemon::from_json(json).expect("valid record");
        assert_eq!([35, 45, 160, 30, 45, 70], pokemon.stats.values());

        let value: serde_json::Value =
            serde_json::from_str(&pokemon.to_json().expect("serializable")).expect("json");
        assert_eq!(100, value["stats"]["Accuracy"]);
        assert_eq!(160, value["stats"]["Defence"]);
    }

    #[test]
    fn null_nickname_reads_as_none() {
        let pokemon = Pokemon::from_json(
            r#"{"name": "Eevee", "level": 1, "xp": 0, "nickname": null,
                "stats": {"HP": 1, "Attack": 1, "Defence": 1, "Sp. Atk": 1, "Sp. Def": 1, "Speed": 1}}"#,
        )
        .expect("valid record");
        assert_eq!(None, pokemon.nickname);
        assert_eq!(None, pokemon.id);
    }

    #[test]
    fn selector_parsing() {
        assert_eq!(Ok(Selector::Latest), "latest".parse::<Selector>());
        assert_eq!(Ok(Selector::Slot(4)), " 4 ".parse::<Selector>());
        assert_eq!(Ok(Selector::Slot(-1)), "-1".parse::<Selector>());
        assert_eq!(
            Err(UnsupportedKeyword("first".to_string())),
            "first".parse::<Selector>()
        );
        assert_eq!(
            Err(UnsupportedKeyword("LATEST".to_string())),
            "LATEST".parse::<Selector>()
        );
    }

    #[test]
    fn starter_lookup_ignores_case() {
        assert_eq!(Some(4), Starter::find("charmander").map(|s| s.id));
        assert_eq!(Some(258), Starter::find(" MUDKIP ").map(|s| s.id));
        assert_eq!(None, Starter::find("Mewtwo"));
    }

    #[test]
    fn hatched_starter_stays_within_iv_range() {
        let mut rng = Hc128Rng::seed_from_u64(7);

        for starter in STARTERS.iter() {
            let pokemon = starter.hatch(&mut rng);
            assert_eq!(starter.name, pokemon.name);
            assert_eq!((1, 0), (pokemon.level, pokemon.xp));
            assert_eq!(Some(starter.id), pokemon.id);
            for (stat, base) in pokemon.stats.values().iter().zip(starter.base) {
                assert!((base..=base + MAX_IV).contains(stat));
            }
        }
    }
}
