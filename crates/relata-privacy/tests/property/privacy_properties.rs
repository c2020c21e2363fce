//! Property tests: filtering is idempotent and leaves nothing the patterns recognize.

use proptest::prelude::*;
use relata_privacy::PrivacyFilter;
use serde_json::{json, Value};

fn email() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", "[a-z]{2,8}", "(com|br|org)").prop_map(|(user, host, tld)| format!("{user}@{host}.{tld}"))
}

fn phone() -> impl Strategy<Value = String> {
    ("[0-9]{2}", "9[0-9]{4}", "[0-9]{4}").prop_map(|(ddd, a, b)| format!("({ddd}) {a}-{b}"))
}

fn cpf() -> impl Strategy<Value = String> {
    ("[0-9]{3}", "[0-9]{3}", "[0-9]{3}", "[0-9]{2}").prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}-{d}"))
}

fn free_text() -> impl Strategy<Value = String> {
    (
        "[A-Za-zçãé ]{0,30}",
        prop_oneof![email(), phone(), cpf(), "[0-9]{7,8}".prop_map(|s| s)],
        "[A-Za-zçãé ]{0,30}",
    )
        .prop_map(|(a, pii, b)| format!("{a} {pii} {b}"))
}

fn report() -> impl Strategy<Value = Value> {
    (free_text(), free_text(), email(), "[0-9]{8}").prop_map(|(activity, conclusion, mail, nusp)| {
        json!({
            "estagiario": {
                "nome_completo": "Fulano de Tal",
                "nusp": nusp,
                "email": mail,
                "curso": "Engenharia Elétrica"
            },
            "supervisor": { "nome": "Beltrano", "email": "b@empresa.com" },
            "atividades_realizadas": [{ "descricao": activity }],
            "conclusao": conclusion
        })
    })
}

fn glued_identifiers() -> impl Strategy<Value = String> {
    let piece = prop_oneof![cpf(), "[0-9]{7,8}".prop_map(|s| s), "[a-z]{1,4}".prop_map(|s| s)];
    (proptest::collection::vec(piece, 1..5), any::<bool>()).prop_map(|(pieces, as_email)| {
        let run = pieces.join(".");
        if as_email {
            format!("{run}@x.com")
        } else {
            run
        }
    })
}

proptest! {
    #[test]
    fn text_filter_is_idempotent(text in free_text()) {
        let filter = PrivacyFilter::default();
        let once = filter.filter_text(&text).text;
        let twice = filter.filter_text(&once).text;
        prop_assert_eq!(&once, &twice);
        prop_assert!(filter.validate_safe(&once));
    }

    #[test]
    fn payload_filter_is_idempotent_and_clean(payload in report()) {
        let filter = PrivacyFilter::default();
        let once = filter.filter_payload(&payload);
        let twice = filter.filter_payload(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.get("supervisor").is_none());
        prop_assert!(once.pointer("/estagiario/nome_completo").is_none());
        prop_assert!(once.pointer("/estagiario/nusp").is_none());
        prop_assert!(once.pointer("/estagiario/email").is_none());
        prop_assert!(filter.audit_payload(&once).is_ok());
    }

    #[test]
    fn glued_identifiers_never_corrupt_neighbouring_text(run in glued_identifiers()) {
        let filter = PrivacyFilter::default();
        let text = format!("início {run} ação");
        let out = filter.filter_text(&text).text;
        prop_assert!(out.starts_with("início "), "{}", out);
        prop_assert!(out.ends_with(" ação"), "{}", out);
        prop_assert!(!out.contains('@'), "{}", out);
        prop_assert_eq!(out.matches('[').count(), out.matches(']').count());
    }
}
