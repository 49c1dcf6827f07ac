//! Integration tests for `DieselSubscriptionRepository` and the catalogue
//! importer against embedded PostgreSQL. Enable with `RUN_PG_EMBEDDED=1`.

use recipebook::domain::ports::{
    CatalogueImport, CatalogueImportRepository, SubscriptionRepository,
    SubscriptionRepositoryError,
};
use recipebook::domain::{NewIngredient, NewTag, UserId};
use recipebook::outbound::persistence::{
    DieselCatalogueImportRepository, DieselSubscriptionRepository,
};
use rstest::{fixture, rstest};

#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::{PgWorld, pg_world, seed_catalogue};

#[fixture]
fn world() -> Option<PgWorld> {
    pg_world()
}

#[rstest]
fn following_twice_is_a_duplicate(world: Option<PgWorld>) {
    let Some(world) = world else { return };
    world.block_on(async {
        let seeded = seed_catalogue(&world.pool).await;
        let repo = DieselSubscriptionRepository::new(world.pool.clone());

        repo.add(seeded.reader.id, seeded.chef.id).await.expect("follow");
        let error = repo
            .add(seeded.reader.id, seeded.chef.id)
            .await
            .expect_err("second follow");
        assert!(
            matches!(error, SubscriptionRepositoryError::Duplicate { .. }),
            "{error:?}"
        );

        let authors = repo.followed_authors(seeded.reader.id).await.expect("authors");
        assert_eq!(
            authors.iter().map(|u| u.username.as_str()).collect::<Vec<_>>(),
            ["chef"]
        );
        assert_eq!(
            repo.followed_ids(seeded.chef.id).await.expect("ids"),
            Vec::<UserId>::new()
        );

        assert!(repo.remove(seeded.reader.id, seeded.chef.id).await.expect("unfollow"));
        assert!(!repo.remove(seeded.reader.id, seeded.chef.id).await.expect("again"));
    });
}

#[rstest]
fn following_an_unknown_author_reports_missing_target(world: Option<PgWorld>) {
    let Some(world) = world else { return };
    world.block_on(async {
        let seeded = seed_catalogue(&world.pool).await;
        let repo = DieselSubscriptionRepository::new(world.pool.clone());

        let error = repo
            .add(seeded.reader.id, UserId::new(9_999))
            .await
            .expect_err("unknown author");
        assert!(
            matches!(error, SubscriptionRepositoryError::MissingTarget { .. }),
            "{error:?}"
        );
    });
}

#[rstest]
fn reimporting_skips_existing_rows(world: Option<PgWorld>) {
    let Some(world) = world else { return };
    world.block_on(async {
        seed_catalogue(&world.pool).await;
        let importer = DieselCatalogueImportRepository::new(world.pool.clone());

        let summary = importer
            .import(&CatalogueImport {
                ingredients: vec![
                    NewIngredient::try_new("flour", "g").expect("ingredient"),
                    NewIngredient::try_new("flour", "kg").expect("ingredient"),
                ],
                tags: vec![NewTag::try_new("Dinner", "#8775D2", "dinner").expect("tag")],
            })
            .await
            .expect("import");
        assert_eq!(summary.ingredients_inserted, 1);
        assert_eq!(summary.ingredients_skipped, 1);
        assert_eq!(summary.tags_inserted, 0);
        assert_eq!(summary.tags_skipped, 1);
    });
}
