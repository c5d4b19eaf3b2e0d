use clientbook_core::{Client, ClientId, ClientRepository, SqliteClientRepository};

fn repo() -> SqliteClientRepository {
    let repo = SqliteClientRepository::open_in_memory().unwrap();
    repo.ensure_schema().unwrap();
    repo
}

struct Seeded {
    repo: SqliteClientRepository,
    anton: ClientId,
    ivan: ClientId,
}

fn seeded() -> Seeded {
    let repo = repo();
    let anton = repo
        .add_client("Anton", "Brylyakov", Some("yoll@rambler.ru"))
        .unwrap();
    repo.add_phone(anton, "89612223333").unwrap();
    let ivan = repo.add_client("Ivan", "Ivanov", None).unwrap();
    repo.add_phone(ivan, "89611112222").unwrap();
    Seeded { repo, anton, ivan }
}

fn ids(clients: &[Client]) -> Vec<ClientId> {
    clients.iter().map(|client| client.client_id).collect()
}

#[test]
fn search_by_first_name() {
    let seeded = seeded();
    let clients = seeded.repo.search_clients("Anton").unwrap();
    assert_eq!(ids(&clients), vec![seeded.anton]);
    assert_eq!(clients[0].last_name, "Brylyakov");
}

#[test]
fn search_by_last_name() {
    let seeded = seeded();
    let clients = seeded.repo.search_clients("Ivanov").unwrap();
    assert_eq!(ids(&clients), vec![seeded.ivan]);
}

#[test]
fn search_by_email() {
    let seeded = seeded();
    let clients = seeded.repo.search_clients("yoll@rambler.ru").unwrap();
    assert_eq!(ids(&clients), vec![seeded.anton]);
}

#[test]
fn search_by_phone_number() {
    let seeded = seeded();
    let clients = seeded.repo.search_clients("89612223333").unwrap();
    assert_eq!(ids(&clients), vec![seeded.anton]);
}

#[test]
fn search_matches_substrings() {
    let seeded = seeded();

    assert_eq!(
        ids(&seeded.repo.search_clients("ramb").unwrap()),
        vec![seeded.anton]
    );
    assert_eq!(
        ids(&seeded.repo.search_clients("1112").unwrap()),
        vec![seeded.ivan]
    );

    let both = seeded.repo.search_clients("8961").unwrap();
    assert_eq!(ids(&both), vec![seeded.anton, seeded.ivan]);
}

#[test]
fn search_without_match_is_empty() {
    let seeded = seeded();
    assert!(seeded.repo.search_clients("Petrov").unwrap().is_empty());
}

#[test]
fn search_is_case_sensitive() {
    let seeded = seeded();
    assert!(seeded.repo.search_clients("anton").unwrap().is_empty());
    assert!(seeded.repo.search_clients("IVANOV").unwrap().is_empty());
    assert_eq!(
        ids(&seeded.repo.search_clients("Anton").unwrap()),
        vec![seeded.anton]
    );
}

#[test]
fn client_with_several_matching_phones_appears_once() {
    let repo = repo();
    let id = repo.add_client("Maria", "Sidorova", None).unwrap();
    repo.add_phone(id, "5551234").unwrap();
    repo.add_phone(id, "5559876").unwrap();
    repo.add_phone(id, "7770000").unwrap();

    let clients = repo.search_clients("555").unwrap();

    assert_eq!(ids(&clients), vec![id]);
}

#[test]
fn client_matching_on_name_and_phone_appears_once() {
    let repo = repo();
    let id = repo.add_client("Olga 42", "Smirnova", None).unwrap();
    repo.add_phone(id, "4200").unwrap();

    let clients = repo.search_clients("42").unwrap();

    assert_eq!(ids(&clients), vec![id]);
}

#[test]
fn client_without_phones_is_still_found_by_name() {
    let repo = repo();
    let id = repo.add_client("Pavel", "Orlov", None).unwrap();

    assert_eq!(ids(&repo.search_clients("Orlov").unwrap()), vec![id]);
}

#[test]
fn removed_phone_no_longer_matches() {
    let repo = repo();
    let id = repo.add_client("Pavel", "Orlov", None).unwrap();
    let phone = repo.add_phone(id, "5551234").unwrap();
    repo.remove_phone(phone).unwrap();

    assert!(repo.search_clients("555").unwrap().is_empty());
}

#[test]
fn anton_and_ivan_scenario() {
    let repo = repo();
    repo.add_client("Anton", "Smith", Some("a@x.com")).unwrap();
    let ivan = repo.add_client("Ivan", "Petrov", None).unwrap();
    repo.add_phone(ivan, "5551234").unwrap();

    let by_phone = repo.search_clients("555").unwrap();
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].first_name, "Ivan");
    assert_eq!(by_phone[0].last_name, "Petrov");

    let by_email = repo.search_clients("a@x.com").unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].first_name, "Anton");
    assert_eq!(by_email[0].last_name, "Smith");

    assert!(repo.search_clients("zzz").unwrap().is_empty());
}

#[test]
fn non_ascii_terms_are_matched() {
    let repo = repo();
    let id = repo.add_client("Антон", "Брыляков", None).unwrap();

    assert_eq!(ids(&repo.search_clients("Брыл").unwrap()), vec![id]);
    assert!(repo.search_clients("брыл").unwrap().is_empty());
}

#[test]
fn search_term_wildcards_follow_like_semantics() {
    let seeded = seeded();
    let everyone = vec![seeded.anton, seeded.ivan];

    assert_eq!(ids(&seeded.repo.search_clients("").unwrap()), everyone);
    assert_eq!(ids(&seeded.repo.search_clients("%").unwrap()), everyone);
    assert_eq!(ids(&seeded.repo.search_clients("_").unwrap()), everyone);
    assert_eq!(
        ids(&seeded.repo.search_clients("An_on").unwrap()),
        vec![seeded.anton]
    );
    assert_eq!(
        ids(&seeded.repo.search_clients("yoll%ru").unwrap()),
        vec![seeded.anton]
    );
    assert!(seeded.repo.search_clients("An_x").unwrap().is_empty());
}
