use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use contactbook_core::{
    Contact, ContactManager, ErrorKind, FixedClock, ManagerError, MeetingKind, SystemClock,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn manager_with_two_contacts() -> ContactManager<FixedClock> {
    let mut manager = ContactManager::with_clock(FixedClock(now()));
    assert_eq!(manager.add_contact(Some("Ann Lee"), Some("colleague")).unwrap(), 1);
    assert_eq!(manager.add_contact(Some("Bob Stone"), Some("")).unwrap(), 2);
    manager
}

fn names(contacts: &[&Contact]) -> Vec<String> {
    contacts.iter().map(|c| c.name().to_string()).collect()
}

#[test]
fn add_contact_then_find_by_id_returns_same_fields() {
    let mut manager = ContactManager::new();
    for (name, notes) in [("Ann", "met in Oslo"), ("", ""), ("Zoë", "line\nbreak")] {
        let id = manager.add_contact(Some(name), Some(notes)).unwrap();
        let found = manager.find_contacts_by_ids(&[id]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), id);
        assert_eq!(found[0].name(), name);
        assert_eq!(found[0].notes(), notes);
    }
}

#[test]
fn add_contact_requires_name_and_notes() {
    let mut manager = ContactManager::new();
    let err = manager.add_contact(None, Some("x")).unwrap_err();
    assert_eq!(err, ManagerError::MissingArgument("name"));
    assert_eq!(err.kind(), ErrorKind::NullReference);

    let err = manager.add_contact(Some("Ann"), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NullReference);
    assert!(manager.contacts().is_empty());
}

#[test]
fn find_contacts_by_ids_rejects_unknown_ids() {
    let manager = manager_with_two_contacts();
    let err = manager.find_contacts_by_ids(&[1, 99]).unwrap_err();
    assert_eq!(err, ManagerError::UnknownContact(99));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let both = manager.find_contacts_by_ids(&[2, 1, 2]).unwrap();
    assert_eq!(names(&both), vec!["Ann Lee", "Bob Stone"]);
}

#[test]
fn find_contacts_by_name_is_case_sensitive_substring_match() {
    let manager = manager_with_two_contacts();

    let found = manager.find_contacts_by_name(Some("Stone")).unwrap();
    assert_eq!(names(&found), vec!["Bob Stone"]);
    assert!(manager.find_contacts_by_name(Some("stone")).unwrap().is_empty());
    assert!(manager.find_contacts_by_name(Some("Zzz")).unwrap().is_empty());
    assert_eq!(manager.find_contacts_by_name(Some("")).unwrap().len(), 2);

    let err = manager.find_contacts_by_name(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NullReference);
}

#[test]
fn add_future_meeting_rejects_dates_not_after_now() {
    let mut manager = manager_with_two_contacts();

    for date in [now(), now() - Duration::seconds(1)] {
        let err = manager.add_future_meeting(&[1], date).unwrap_err();
        assert_eq!(err, ManagerError::DateNotInFuture(date));
    }
    // The date check wins even when attendees are invalid too.
    let err = manager
        .add_future_meeting(&[42], now() - Duration::days(3))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(matches!(err, ManagerError::DateNotInFuture(_)));
    assert!(manager.meetings().is_empty());
}

#[test]
fn add_future_meeting_validates_attendees() {
    let mut manager = manager_with_two_contacts();
    let tomorrow = now() + Duration::days(1);

    assert_eq!(
        manager.add_future_meeting(&[1, 3], tomorrow).unwrap_err(),
        ManagerError::UnknownContact(3)
    );
    assert_eq!(
        manager.add_future_meeting(&[], tomorrow).unwrap_err(),
        ManagerError::EmptyAttendees
    );
}

#[test]
fn future_meeting_scenario() {
    let mut manager = manager_with_two_contacts();
    let date = now().checked_add_months(Months::new(5)).unwrap();
    let id = manager.add_future_meeting(&[1, 2], date).unwrap();

    let meeting = manager.get_future_meeting(id).unwrap().unwrap();
    assert_eq!(meeting.date(), date);
    assert_eq!(meeting.attendees().iter().copied().collect::<Vec<_>>(), vec![1, 2]);

    let err = manager.get_past_meeting(id).unwrap_err();
    assert_eq!(err, ManagerError::MeetingInFuture(id));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = manager.add_meeting_notes(id, Some("text")).unwrap_err();
    assert_eq!(err, ManagerError::NotesOnFutureMeeting(id));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(!manager.get_meeting(id).unwrap().is_recorded_past());
}

#[test]
fn future_meeting_scenario_on_system_clock() {
    let mut manager = ContactManager::with_clock(SystemClock);
    let ann = manager.add_contact(Some("Ann"), Some("")).unwrap();
    let bob = manager.add_contact(Some("Bob"), Some("")).unwrap();
    let date = chrono::Local::now()
        .naive_local()
        .checked_add_months(Months::new(5))
        .unwrap();

    let id = manager.add_future_meeting(&[ann, bob], date).unwrap();
    assert_eq!(manager.get_future_meeting(id).unwrap().unwrap().attendees().len(), 2);
    assert!(manager.get_past_meeting(id).is_err());
}

#[test]
fn lookups_for_unknown_meeting_ids_return_none() {
    let manager = manager_with_two_contacts();
    assert!(manager.get_meeting(7).is_none());
    assert!(manager.get_future_meeting(7).unwrap().is_none());
    assert!(manager.get_past_meeting(7).unwrap().is_none());
}

#[test]
fn past_meeting_scenario() {
    let mut manager = manager_with_two_contacts();
    let date = now().checked_sub_months(Months::new(5)).unwrap();
    let id = manager
        .add_new_past_meeting(Some(&[1][..]), Some(date), Some("discussed X"))
        .unwrap();

    let meetings = manager.get_past_meetings_for_contact(1).unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0].id(), id);
    assert_eq!(meetings[0].notes(), Some("discussed X"));

    assert!(manager.get_past_meetings_for_contact(2).unwrap().is_empty());
    assert_eq!(
        manager.get_future_meeting(id).unwrap_err(),
        ManagerError::MeetingInPast(id)
    );
    assert_eq!(
        manager.find_contacts_by_ids(&[99]).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn past_meeting_with_future_date_is_stored_but_classified_as_future() {
    let mut manager = manager_with_two_contacts();
    let date = now() + Duration::days(30);
    let id = manager
        .add_new_past_meeting(Some(&[2][..]), Some(date), Some("planned"))
        .unwrap();

    let stored = manager.get_meeting(id).unwrap();
    assert_eq!(stored.notes(), Some("planned"));
    assert_eq!(
        manager.get_past_meeting(id).unwrap_err(),
        ManagerError::MeetingInFuture(id)
    );
    assert_eq!(manager.get_future_meeting(id).unwrap().unwrap().id(), id);

    let future = manager.get_future_meetings_for_contact(2).unwrap();
    assert_eq!(future.len(), 1);
    assert!(manager.get_past_meetings_for_contact(2).unwrap().is_empty());
    assert_eq!(
        manager.add_meeting_notes(id, Some("early")).unwrap_err().kind(),
        ErrorKind::InvalidState
    );
}

#[test]
fn add_new_past_meeting_argument_checks() {
    let mut manager = manager_with_two_contacts();
    let date = now() - Duration::days(1);

    let missing = [
        manager.add_new_past_meeting(None, Some(date), Some("n")),
        manager.add_new_past_meeting(Some(&[1][..]), None, Some("n")),
        manager.add_new_past_meeting(Some(&[1][..]), Some(date), None),
    ];
    for result in missing {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NullReference);
    }

    assert_eq!(
        manager
            .add_new_past_meeting(Some(&[][..]), Some(date), Some("n"))
            .unwrap_err(),
        ManagerError::EmptyAttendees
    );
    assert_eq!(
        manager
            .add_new_past_meeting(Some(&[1, 5][..]), Some(date), Some("n"))
            .unwrap_err(),
        ManagerError::UnknownContact(5)
    );
    assert!(manager.meetings().is_empty());
}

#[test]
fn contact_queries_reject_unknown_contacts() {
    let manager = manager_with_two_contacts();
    assert_eq!(
        manager.get_future_meetings_for_contact(9).unwrap_err(),
        ManagerError::UnknownContact(9)
    );
    assert_eq!(
        manager.get_past_meetings_for_contact(9).unwrap_err(),
        ManagerError::UnknownContact(9)
    );
}

#[test]
fn future_meetings_for_contact_are_sorted_and_stable() {
    let mut manager = manager_with_two_contacts();
    let late = manager
        .add_future_meeting(&[1], now() + Duration::days(10))
        .unwrap();
    let early = manager
        .add_future_meeting(&[1, 2], now() + Duration::days(2))
        .unwrap();
    let other = manager
        .add_future_meeting(&[2], now() + Duration::days(5))
        .unwrap();
    manager
        .add_new_past_meeting(Some(&[1][..]), Some(now() - Duration::days(1)), Some(""))
        .unwrap();

    let first = manager.get_future_meetings_for_contact(1).unwrap();
    let ids: Vec<_> = first.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec![early, late]);

    let second = manager.get_future_meetings_for_contact(1).unwrap();
    assert_eq!(first, second);

    let bob: Vec<_> = manager
        .get_future_meetings_for_contact(2)
        .unwrap()
        .iter()
        .map(|m| m.id())
        .collect();
    assert_eq!(bob, vec![early, other]);
}

#[test]
fn meetings_on_date_include_both_variants_sorted_by_time() {
    let mut manager = manager_with_two_contacts();
    let today = now().date();
    let evening = manager
        .add_future_meeting(&[1], today.and_hms_opt(18, 0, 0).unwrap())
        .unwrap();
    let morning = manager
        .add_new_past_meeting(
            Some(&[2][..]),
            Some(today.and_hms_opt(8, 30, 0).unwrap()),
            Some("standup"),
        )
        .unwrap();
    manager
        .add_future_meeting(&[1], now() + Duration::days(1))
        .unwrap();

    let on_day: Vec<_> = manager
        .get_meetings_on_date(today)
        .iter()
        .map(|m| m.id())
        .collect();
    assert_eq!(on_day, vec![morning, evening]);
    assert!(manager
        .get_meetings_on_date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        .is_empty());
}

#[test]
fn add_meeting_notes_converts_elapsed_future_meeting() {
    let mut manager = manager_with_two_contacts();
    let date = now() + Duration::hours(1);
    let id = manager.add_future_meeting(&[1, 2], date).unwrap();

    // Time passes: the same state viewed from a later clock.
    let snapshot = manager.snapshot();
    let mut later = ContactManager::with_clock(FixedClock(now() + Duration::days(1)));
    later.restore(snapshot).unwrap();

    assert_eq!(later.get_past_meeting(id).unwrap().unwrap().notes(), None);
    later.add_meeting_notes(id, Some("went well")).unwrap();

    let converted = later.get_meeting(id).unwrap();
    assert_eq!(converted.id(), id);
    assert_eq!(converted.date(), date);
    assert_eq!(
        converted.kind(),
        &MeetingKind::Past {
            notes: "went well".to_string()
        }
    );
    assert_eq!(converted.attendees().len(), 2);
    assert_eq!(later.meetings().len(), 1);
}

#[test]
fn add_meeting_notes_overwrites_existing_notes() {
    let mut manager = manager_with_two_contacts();
    let id = manager
        .add_new_past_meeting(Some(&[1][..]), Some(now() - Duration::days(2)), Some("draft"))
        .unwrap();

    manager.add_meeting_notes(id, Some("final")).unwrap();
    assert_eq!(manager.get_meeting(id).unwrap().notes(), Some("final"));
}

#[test]
fn add_meeting_notes_error_precedence() {
    let mut manager = manager_with_two_contacts();
    assert_eq!(
        manager.add_meeting_notes(5, None).unwrap_err(),
        ManagerError::UnknownMeeting(5)
    );

    let future = manager
        .add_future_meeting(&[1], now() + Duration::days(1))
        .unwrap();
    assert_eq!(
        manager.add_meeting_notes(future, None).unwrap_err().kind(),
        ErrorKind::InvalidState
    );

    let past = manager
        .add_new_past_meeting(Some(&[1][..]), Some(now()), Some("kept"))
        .unwrap();
    assert_eq!(
        manager.add_meeting_notes(past, None).unwrap_err(),
        ManagerError::MissingArgument("text")
    );
    assert_eq!(manager.get_meeting(past).unwrap().notes(), Some("kept"));
}

#[test]
fn contact_notes_can_be_set_and_appended() {
    let mut manager = manager_with_two_contacts();
    manager.add_contact_notes(2, Some("likes tea")).unwrap();
    manager.add_contact_notes(2, Some("has a dog")).unwrap();
    assert_eq!(manager.contact(2).unwrap().notes(), "likes tea\nhas a dog");

    manager.set_contact_notes(2, Some("reset")).unwrap();
    assert_eq!(manager.contact(2).unwrap().notes(), "reset");

    assert_eq!(
        manager.set_contact_notes(8, Some("x")).unwrap_err(),
        ManagerError::UnknownContact(8)
    );
    assert_eq!(
        manager.add_contact_notes(1, None).unwrap_err().kind(),
        ErrorKind::NullReference
    );
}
