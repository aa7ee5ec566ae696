use foodgram_recipe::{IngredientAmount, RecipeInput, RecipesQuery};
use foodgram_shared::{Error, MAX_VALUE, Pagination};

mod helpers;

#[tokio::test]
async fn test_create_recipe() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g"), ("eggs", "pcs")]).await?;

    let recipe = state
        .command
        .create(
            john,
            helpers::recipe_input("Pancakes", vec![(ids[0], 200), (ids[1], 2)], vec![lunch]),
        )
        .await?;

    assert_eq!(recipe.name, "Pancakes");
    assert_eq!(recipe.author.id, john);
    assert_eq!(recipe.tags.len(), 1);
    assert_eq!(recipe.tags[0].slug, "lunch");
    assert_eq!(recipe.ingredients.len(), 2);
    assert!(!recipe.is_favorited);
    assert!(recipe.image.starts_with("recipes/"));
    assert!(state.dir.child("media").join(&recipe.image).exists());

    let flour = recipe
        .ingredients
        .iter()
        .find(|i| i.name == "flour")
        .expect("flour");
    assert_eq!(flour.amount, 200);
    assert_eq!(flour.measurement_unit, "g");

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_empty_tags_and_ingredients() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;

    let err = state
        .command
        .create(john, helpers::recipe_input("Empty", vec![], vec![]))
        .await
        .unwrap_err();

    assert_eq!(helpers::field_errors(&err), vec!["ingredients", "tags"]);

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_duplicate_ids() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    let err = state
        .command
        .create(
            john,
            helpers::recipe_input("Bread", vec![(ids[0], 100), (ids[0], 50)], vec![lunch]),
        )
        .await
        .unwrap_err();
    assert_eq!(helpers::field_errors(&err), vec!["ingredients"]);

    let err = state
        .command
        .create(
            john,
            helpers::recipe_input("Bread", vec![(ids[0], 100)], vec![lunch, lunch]),
        )
        .await
        .unwrap_err();
    assert_eq!(helpers::field_errors(&err), vec!["tags"]);

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_unknown_references() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    let err = state
        .command
        .create(
            john,
            helpers::recipe_input("Bread", vec![(ids[0], 100), (999, 1)], vec![lunch, 999]),
        )
        .await
        .unwrap_err();

    assert_eq!(helpers::field_errors(&err), vec!["ingredients", "tags"]);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipe")
        .fetch_one(state.pool())
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_out_of_bounds_values() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    let err = state
        .command
        .create(
            john,
            RecipeInput {
                cooking_time: Some(0),
                ..helpers::recipe_input("Bread", vec![(ids[0], MAX_VALUE + 1)], vec![lunch])
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        helpers::field_errors(&err),
        vec!["cooking_time", "ingredients"]
    );

    Ok(())
}

#[tokio::test]
async fn test_create_requires_image_and_fields() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    let err = state
        .command
        .create(
            john,
            RecipeInput {
                ingredients: vec![IngredientAmount {
                    id: ids[0],
                    amount: 1,
                }],
                tags: vec![lunch],
                image: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        helpers::field_errors(&err),
        vec!["cooking_time", "image", "name", "text"]
    );

    let err = state
        .command
        .create(
            john,
            RecipeInput {
                image: Some("data:image/png;base64,@@@".to_owned()),
                ..helpers::recipe_input("Bread", vec![(ids[0], 1)], vec![lunch])
            },
        )
        .await
        .unwrap_err();
    assert_eq!(helpers::field_errors(&err), vec!["image"]);

    Ok(())
}

#[tokio::test]
async fn test_update_replaces_relations() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let dinner = helpers::create_tag(&state, "dinner").await?;
    let ids =
        helpers::create_ingredients(&state, &[("flour", "g"), ("milk", "ml"), ("salt", "g")])
            .await?;

    let recipe = state
        .command
        .create(
            john,
            helpers::recipe_input("Pancakes", vec![(ids[0], 200), (ids[1], 300)], vec![lunch]),
        )
        .await?;

    let updated = state
        .command
        .update(
            john,
            recipe.id,
            RecipeInput {
                ingredients: vec![IngredientAmount {
                    id: ids[2],
                    amount: 5,
                }],
                tags: vec![dinner],
                name: Some("Salty pancakes".to_owned()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.name, "Salty pancakes");
    assert_eq!(updated.text, recipe.text);
    assert_eq!(updated.image, recipe.image);
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].name, "salt");
    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.tags[0].id, dinner);

    Ok(())
}

#[tokio::test]
async fn test_failed_update_keeps_relations() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g"), ("milk", "ml")]).await?;

    let recipe = state
        .command
        .create(
            john,
            helpers::recipe_input("Pancakes", vec![(ids[0], 200), (ids[1], 300)], vec![lunch]),
        )
        .await?;

    let err = state
        .command
        .update(
            john,
            recipe.id,
            RecipeInput {
                ingredients: vec![
                    IngredientAmount {
                        id: ids[1],
                        amount: 1,
                    },
                    IngredientAmount {
                        id: ids[1],
                        amount: 2,
                    },
                ],
                tags: vec![lunch],
                name: Some("Broken".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validate(_)));

    let loaded = foodgram_recipe::find(state.pool(), recipe.id, None)
        .await?
        .expect("recipe");
    assert_eq!(loaded.name, "Pancakes");
    assert_eq!(loaded.ingredients, recipe.ingredients);

    Ok(())
}

#[tokio::test]
async fn test_only_author_can_mutate() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let albert = helpers::create_user(&state, "albert").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    let recipe = state
        .command
        .create(
            john,
            helpers::recipe_input("Bread", vec![(ids[0], 500)], vec![lunch]),
        )
        .await?;

    let err = state
        .command
        .update(
            albert,
            recipe.id,
            helpers::recipe_input("Stolen", vec![(ids[0], 1)], vec![lunch]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden));

    let err = state.command.delete(albert, recipe.id).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden));

    let err = state.command.delete(john, 999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    state.command.delete(john, recipe.id).await?;
    assert!(
        foodgram_recipe::find(state.pool(), recipe.id, None)
            .await?
            .is_none()
    );

    Ok(())
}

#[tokio::test]
async fn test_delete_cascades() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let albert = helpers::create_user(&state, "albert").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    let recipe = state
        .command
        .create(
            john,
            helpers::recipe_input("Bread", vec![(ids[0], 500)], vec![lunch]),
        )
        .await?;
    state.command.favorite.add(albert, recipe.id).await?;
    state.command.shopping_cart.add(albert, recipe.id).await?;

    state.command.delete(john, recipe.id).await?;

    for table in [
        "recipe_ingredient",
        "recipe_tag",
        "favorite",
        "shopping_cart",
    ] {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(state.pool())
            .await?;
        assert_eq!(count, 0, "{table} still has rows");
    }

    assert!(!state.dir.child("media").join(&recipe.image).exists());

    Ok(())
}

#[tokio::test]
async fn test_list_filters() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let albert = helpers::create_user(&state, "albert").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let dinner = helpers::create_tag(&state, "dinner").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    let bread = state
        .command
        .create(
            john,
            helpers::recipe_input("Bread", vec![(ids[0], 500)], vec![lunch]),
        )
        .await?;
    let pie = state
        .command
        .create(
            john,
            helpers::recipe_input("Pie", vec![(ids[0], 300)], vec![dinner]),
        )
        .await?;
    let cake = state
        .command
        .create(
            albert,
            helpers::recipe_input("Cake", vec![(ids[0], 250)], vec![lunch, dinner]),
        )
        .await?;

    let all = foodgram_recipe::list(state.pool(), RecipesQuery::default()).await?;
    assert_eq!(all.count, 3);
    assert_eq!(
        all.results.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![cake.id, pie.id, bread.id]
    );

    let by_author = foodgram_recipe::list(
        state.pool(),
        RecipesQuery {
            author: Some(john),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_author.count, 2);

    let by_tag = foodgram_recipe::list(
        state.pool(),
        RecipesQuery {
            tags: vec!["lunch".to_owned()],
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(
        by_tag.results.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![cake.id, bread.id]
    );

    state.command.favorite.add(albert, pie.id).await?;
    let favorites = foodgram_recipe::list(
        state.pool(),
        RecipesQuery {
            viewer: Some(albert),
            is_favorited: true,
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(favorites.count, 1);
    assert!(favorites.results[0].is_favorited);
    assert_eq!(favorites.results[0].id, pie.id);

    let anonymous = foodgram_recipe::list(
        state.pool(),
        RecipesQuery {
            is_favorited: true,
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(anonymous.count, 3);

    let paged = foodgram_recipe::list(
        state.pool(),
        RecipesQuery {
            pagination: Pagination::new(2, 2),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(paged.count, 3);
    assert_eq!(paged.results.len(), 1);
    assert!(!paged.has_next());

    Ok(())
}

#[tokio::test]
async fn test_create_reports_ingredient_removed_after_validation() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    // Drops the ingredient between validation and the relation insert.
    sqlx::query(&format!(
        "CREATE TRIGGER drop_flour BEFORE INSERT ON recipe BEGIN DELETE FROM ingredient WHERE id = {}; END",
        ids[0]
    ))
    .execute(state.pool())
    .await?;

    let err = state
        .command
        .create(john, helpers::recipe_input("Bread", vec![(ids[0], 100)], vec![lunch]))
        .await
        .unwrap_err();
    assert_eq!(helpers::field_errors(&err), vec!["ingredients"]);

    let page = foodgram_recipe::list(state.pool(), RecipesQuery::default()).await?;
    assert_eq!(page.count, 0);

    let recipes_dir = state.dir.child("media").join("recipes");
    assert_eq!(std::fs::read_dir(recipes_dir)?.count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_update_reports_tag_removed_after_validation() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let dinner = helpers::create_tag(&state, "dinner").await?;
    let ids = helpers::create_ingredients(&state, &[("flour", "g")]).await?;

    let recipe = state
        .command
        .create(john, helpers::recipe_input("Bread", vec![(ids[0], 100)], vec![lunch]))
        .await?;

    sqlx::query(&format!(
        "CREATE TRIGGER drop_dinner BEFORE UPDATE ON recipe BEGIN DELETE FROM tag WHERE id = {dinner}; END"
    ))
    .execute(state.pool())
    .await?;

    let input = RecipeInput {
        name: Some("Dinner bread".to_owned()),
        tags: vec![dinner],
        ingredients: vec![IngredientAmount {
            id: ids[0],
            amount: 50,
        }],
        ..Default::default()
    };

    let err = state
        .command
        .update(john, recipe.id, input)
        .await
        .unwrap_err();
    assert_eq!(helpers::field_errors(&err), vec!["tags"]);

    let unchanged = foodgram_recipe::find(state.pool(), recipe.id, None)
        .await?
        .expect("recipe");
    assert_eq!(unchanged.name, "Bread");
    assert_eq!(unchanged.tags[0].slug, "lunch");
    assert_eq!(unchanged.ingredients[0].amount, 100);

    Ok(())
}
